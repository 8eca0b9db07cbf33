use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{dates, LcatId};

/// Labor category with its current published and default bill rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lcat {
    pub id: LcatId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub current_published_rate: Option<Decimal>,
    pub current_default_bill_rate: Option<Decimal>,
    #[serde(default)]
    pub position_titles: Vec<String>,
    pub is_active: bool,
    #[serde(with = "dates")]
    pub created_date: OffsetDateTime,
    #[serde(default, with = "dates::option")]
    pub modified_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLcat {
    pub name: String,
    pub description: String,
    pub published_rate: Decimal,
    pub default_bill_rate: Decimal,
    pub position_titles: Vec<String>,
}

impl CreateLcat {
    /// Split a comma separated list of titles, dropping blanks.
    pub fn parse_titles(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcatRateUpdate {
    pub lcat_id: LcatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_bill_rate: Option<Decimal>,
}

impl LcatRateUpdate {
    pub fn new(lcat_id: LcatId) -> Self {
        Self {
            lcat_id,
            ..Default::default()
        }
    }

    pub fn apply_to(&self, lcat: &mut Lcat) {
        if let Some(rate) = self.published_rate {
            lcat.current_published_rate = Some(rate);
        }
        if let Some(rate) = self.default_bill_rate {
            lcat.current_default_bill_rate = Some(rate);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRates {
    #[serde(with = "dates")]
    pub effective_date: OffsetDateTime,
    pub notes: String,
    pub rate_updates: Vec<LcatRateUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn titles_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            CreateLcat::parse_titles(" Analyst I, ,Analyst II ,"),
            vec!["Analyst I".to_string(), "Analyst II".to_string()]
        );
    }

    #[test]
    fn lcat_accepts_null_rates() {
        let raw = r#"{
            "id": "l-1",
            "name": "Systems Engineer III",
            "description": "",
            "currentPublishedRate": null,
            "currentDefaultBillRate": 145.5,
            "positionTitles": ["SE3"],
            "isActive": true,
            "createdDate": "2024-02-01T00:00:00",
            "modifiedDate": null
        }"#;
        let lcat: Lcat = serde_json::from_str(raw).unwrap();
        assert_eq!(lcat.current_published_rate, None);
        assert_eq!(lcat.current_default_bill_rate, Some(dec!(145.5)));
        assert_eq!(lcat.modified_date, None);
    }

    #[test]
    fn rate_update_skips_unset_rates() {
        let update = LcatRateUpdate {
            default_bill_rate: Some(dec!(150)),
            ..LcatRateUpdate::new(LcatId::new("l-1"))
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "lcatId": "l-1", "defaultBillRate": 150.0 }));
    }
}
