use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{format::to_date_input, ContractId, LcatId, Resource, ResourceType};

/// Anything that can be rendered as URL query parameters.
pub trait QueryFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFilters {
    pub search_term: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub lcat_id: Option<LcatId>,
    pub contract_id: Option<ContractId>,
    pub is_active: Option<bool>,
}

impl ResourceFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Client-side equivalent of the server filter, used by the in-memory backend.
    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(term) = self.search_term.as_deref().map(str::trim) {
            if !term.is_empty() {
                let term = term.to_lowercase();
                let hit = resource.full_name.to_lowercase().contains(&term)
                    || resource.email.to_lowercase().contains(&term);
                if !hit {
                    return false;
                }
            }
        }
        if self
            .resource_type
            .is_some_and(|t| t != resource.resource_type)
        {
            return false;
        }
        if self.lcat_id.as_ref().is_some_and(|id| id != &resource.lcat_id) {
            return false;
        }
        if self
            .contract_id
            .as_ref()
            .is_some_and(|id| resource.contract_id.as_ref() != Some(id))
        {
            return false;
        }
        if self.is_active.is_some_and(|a| a != resource.is_active) {
            return false;
        }
        true
    }
}

impl QueryFilter for ResourceFilters {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(term) = self.search_term.as_deref().filter(|t| !t.trim().is_empty()) {
            pairs.push(("search", term.to_string()));
        }
        if let Some(kind) = self.resource_type {
            pairs.push(("type", kind.as_str().to_string()));
        }
        if let Some(id) = &self.lcat_id {
            pairs.push(("lcatId", id.to_string()));
        }
        if let Some(id) = &self.contract_id {
            pairs.push(("contractId", id.to_string()));
        }
        if let Some(active) = self.is_active {
            pairs.push(("isActive", active.to_string()));
        }
        pairs
    }
}

/// `minAvailablePercentage` for the available-resources listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityFilter {
    pub min_available_percentage: Option<Decimal>,
}

impl QueryFilter for AvailabilityFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.min_available_percentage
            .map(|p| vec![("minAvailablePercentage", p.normalize().to_string())])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionFilter {
    pub months: u32,
}

impl QueryFilter for ProjectionFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("months", self.months.to_string())]
    }
}

/// Optional end date sent when an assignment is removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovalFilter {
    pub end_date: Option<OffsetDateTime>,
}

impl QueryFilter for RemovalFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.end_date
            .map(|d| vec![("endDate", to_date_input(d))])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnderwaterFilter {
    pub contract_id: Option<ContractId>,
}

impl QueryFilter for UnderwaterFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.contract_id
            .as_ref()
            .map(|id| vec![("contractId", id.to_string())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    #[test]
    fn blank_search_is_not_sent() {
        let filters = ResourceFilters {
            search_term: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filters.query_pairs().is_empty());
    }

    #[test]
    fn query_order_is_stable() {
        let filters = ResourceFilters {
            search_term: Some("a".to_string()),
            resource_type: Some(ResourceType::W2Internal),
            lcat_id: Some(LcatId::new("l")),
            contract_id: Some(ContractId::new("c")),
            is_active: Some(false),
        };
        let keys: Vec<_> = filters.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["search", "type", "lcatId", "contractId", "isActive"]);
    }

    #[test]
    fn small_filters() {
        let availability = AvailabilityFilter {
            min_available_percentage: Some(dec!(25.0)),
        };
        assert_eq!(
            availability.query_pairs(),
            vec![("minAvailablePercentage", "25".to_string())]
        );
        let removal = RemovalFilter {
            end_date: Some(datetime!(2025-09-30 00:00:00 UTC)),
        };
        assert_eq!(removal.query_pairs(), vec![("endDate", "2025-09-30".to_string())]);
        assert!(UnderwaterFilter::default().query_pairs().is_empty());
        assert_eq!(
            ProjectionFilter { months: 12 }.query_pairs(),
            vec![("months", "12".to_string())]
        );
    }
}
