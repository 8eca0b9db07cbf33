use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{dates, ContractId, LcatId, ResourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    W2Internal,
    Subcontractor,
    Contractor1099,
    FixedPrice,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::W2Internal,
        ResourceType::Subcontractor,
        ResourceType::Contractor1099,
        ResourceType::FixedPrice,
    ];

    /// Multiplier from raw hourly pay to fully burdened cost.
    pub fn wrap_rate(&self) -> Decimal {
        match self {
            ResourceType::W2Internal => dec!(2.28),
            ResourceType::Subcontractor => dec!(1.15),
            ResourceType::Contractor1099 => dec!(1.15),
            ResourceType::FixedPrice => dec!(1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::W2Internal => "W2Internal",
            ResourceType::Subcontractor => "Subcontractor",
            ResourceType::Contractor1099 => "Contractor1099",
            ResourceType::FixedPrice => "FixedPrice",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::W2Internal => "W2",
            ResourceType::Subcontractor => "Sub",
            ResourceType::Contractor1099 => "1099",
            ResourceType::FixedPrice => "FP",
        }
    }

    /// Next variant in display order, wrapping around. Used to cycle a filter.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

pub fn burdened_cost(hourly_rate: Decimal, resource_type: ResourceType) -> Decimal {
    hourly_rate * resource_type.wrap_rate()
}

/// `None` when there is no bill rate to compare against.
pub fn margin(bill_rate: Option<Decimal>, burdened_cost: Decimal) -> Option<Decimal> {
    bill_rate.map(|rate| rate - burdened_cost)
}

pub fn is_underwater(margin: Option<Decimal>) -> bool {
    margin.is_some_and(|m| m < Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub resource_type: ResourceType,
    pub lcat_id: LcatId,
    #[serde(default)]
    pub lcat_name: Option<String>,
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    #[serde(default)]
    pub contract_name: Option<String>,
    pub hourly_rate: Decimal,
    #[serde(default)]
    pub annual_salary: Option<Decimal>,
    pub burdened_cost: Decimal,
    #[serde(default)]
    pub bill_rate: Option<Decimal>,
    #[serde(default)]
    pub margin: Option<Decimal>,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "dates::option")]
    pub end_date: Option<OffsetDateTime>,
    pub is_active: bool,
    #[serde(default, with = "dates::option")]
    pub created_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub fixed_price_amount: Option<Decimal>,
    #[serde(default)]
    pub fixed_price_hours: Option<Decimal>,
}

impl Resource {
    /// Margin recomputed from the record's bill rate and burdened cost.
    pub fn computed_margin(&self) -> Option<Decimal> {
        margin(self.bill_rate, self.burdened_cost)
    }

    pub fn is_underwater(&self) -> bool {
        is_underwater(self.computed_margin())
    }

    /// Burdened cost the wrap-rate table predicts for this record.
    pub fn expected_burdened_cost(&self) -> Decimal {
        burdened_cost(self.hourly_rate, self.resource_type)
    }
}

pub fn underwater_resources(resources: &[Resource]) -> Vec<&Resource> {
    resources.iter().filter(|r| r.is_underwater()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub resource_type: ResourceType,
    pub lcat_id: LcatId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
    pub hourly_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_salary: Option<Decimal>,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price_hours: Option<Decimal>,
}

/// Partial update: only the fields that are `Some` are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResource {
    pub id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcat_id: Option<LcatId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_salary: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dates::option"
    )]
    pub end_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateResource {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Copy every set field onto `resource`.
    pub fn apply_to(&self, resource: &mut Resource) {
        if let Some(v) = &self.first_name {
            resource.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            resource.last_name = v.clone();
        }
        if self.first_name.is_some() || self.last_name.is_some() {
            resource.full_name = format!("{} {}", resource.first_name, resource.last_name);
        }
        if let Some(v) = &self.email {
            resource.email = v.clone();
        }
        if let Some(v) = &self.lcat_id {
            resource.lcat_id = v.clone();
        }
        if let Some(v) = &self.contract_id {
            resource.contract_id = Some(v.clone());
        }
        if let Some(v) = self.hourly_rate {
            resource.hourly_rate = v;
            resource.burdened_cost = burdened_cost(v, resource.resource_type);
            resource.margin = margin(resource.bill_rate, resource.burdened_cost);
        }
        if let Some(v) = self.annual_salary {
            resource.annual_salary = Some(v);
        }
        if let Some(v) = self.end_date {
            resource.end_date = Some(v);
        }
        if let Some(v) = self.is_active {
            resource.is_active = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResources {
    #[serde(with = "dates")]
    pub effective_date: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub resource_updates: Vec<UpdateResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateResource {
    #[serde(with = "dates")]
    pub end_date: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignContract {
    pub contract_id: ContractId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn resource(rate: Decimal, bill: Option<Decimal>, kind: ResourceType) -> Resource {
        let burdened = burdened_cost(rate, kind);
        Resource {
            id: ResourceId::new("r-1"),
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            full_name: "Dana Reyes".to_string(),
            email: "dana@example.com".to_string(),
            resource_type: kind,
            lcat_id: LcatId::new("l-1"),
            lcat_name: None,
            contract_id: None,
            contract_name: None,
            hourly_rate: rate,
            annual_salary: None,
            burdened_cost: burdened,
            bill_rate: bill,
            margin: margin(bill, burdened),
            start_date: datetime!(2024-01-01 00:00:00 UTC),
            end_date: None,
            is_active: true,
            created_date: None,
            created_by: None,
            fixed_price_amount: None,
            fixed_price_hours: None,
        }
    }

    #[test]
    fn w2_wrap_rate_example() {
        assert_eq!(burdened_cost(dec!(50), ResourceType::W2Internal), dec!(114.00));
    }

    #[test]
    fn wrap_rate_table() {
        assert_eq!(ResourceType::W2Internal.wrap_rate(), dec!(2.28));
        assert_eq!(ResourceType::Subcontractor.wrap_rate(), dec!(1.15));
        assert_eq!(ResourceType::Contractor1099.wrap_rate(), dec!(1.15));
        assert_eq!(ResourceType::FixedPrice.wrap_rate(), dec!(1.0));
    }

    #[test]
    fn negative_margin_is_underwater() {
        let m = margin(Some(dec!(100)), dec!(114));
        assert_eq!(m, Some(dec!(-14)));
        assert!(is_underwater(m));
    }

    #[test]
    fn missing_bill_rate_has_no_margin() {
        assert_eq!(margin(None, dec!(114)), None);
        assert!(!is_underwater(None));
    }

    #[test]
    fn zero_margin_is_not_underwater() {
        assert!(!is_underwater(Some(Decimal::ZERO)));
        assert!(!is_underwater(Some(dec!(-0.00))));
    }

    #[test]
    fn underwater_filter_uses_recomputed_margin() {
        let list = vec![
            resource(dec!(50), Some(dec!(100)), ResourceType::W2Internal),
            resource(dec!(50), Some(dec!(150)), ResourceType::W2Internal),
            resource(dec!(50), None, ResourceType::W2Internal),
        ];
        let underwater = underwater_resources(&list);
        assert_eq!(underwater.len(), 1);
        assert_eq!(underwater[0].bill_rate, Some(dec!(100)));
    }

    #[test]
    fn update_only_serializes_set_fields() {
        let update = UpdateResource {
            hourly_rate: Some(dec!(60)),
            ..UpdateResource::new(ResourceId::new("r-9"))
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "r-9", "hourlyRate": 60.0 }));
    }

    #[test]
    fn applying_rate_change_recomputes_cost() {
        let mut r = resource(dec!(50), Some(dec!(110)), ResourceType::Subcontractor);
        assert!(!r.is_underwater());
        let update = UpdateResource {
            hourly_rate: Some(dec!(100)),
            ..UpdateResource::new(r.id.clone())
        };
        update.apply_to(&mut r);
        assert_eq!(r.burdened_cost, dec!(115.00));
        assert!(r.is_underwater());
    }

    #[test]
    fn type_filter_cycles() {
        assert_eq!(ResourceType::FixedPrice.next(), ResourceType::W2Internal);
    }
}
