use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::{dates, ContractId};

/// Standard full-time hours per year used when a new contract is drafted.
pub const DEFAULT_FULL_TIME_HOURS: Decimal = dec!(1912);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    FixedPrice,
    TimeAndMaterials,
    CostPlus,
    LaborHourOnly,
}

impl ContractType {
    pub const ALL: [ContractType; 4] = [
        ContractType::FixedPrice,
        ContractType::TimeAndMaterials,
        ContractType::CostPlus,
        ContractType::LaborHourOnly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContractType::FixedPrice => "Fixed Price",
            ContractType::TimeAndMaterials => "T&M",
            ContractType::CostPlus => "Cost Plus",
            ContractType::LaborHourOnly => "Labor Hour",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    Draft,
    Active,
    Closed,
}

impl ContractStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "Draft",
            ContractStatus::Active => "Active",
            ContractStatus::Closed => "Closed",
        }
    }

    pub fn can_activate(&self) -> bool {
        matches!(self, ContractStatus::Draft)
    }

    pub fn can_close(&self) -> bool {
        matches!(self, ContractStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: ContractId,
    pub contract_number: String,
    pub contract_name: String,
    pub customer_name: String,
    pub prime_contractor: String,
    pub is_prime: bool,
    pub contract_type: ContractType,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(with = "dates")]
    pub end_date: OffsetDateTime,
    pub total_value: Decimal,
    pub funded_value: Decimal,
    pub standard_full_time_hours: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ContractStatus,
    #[serde(with = "dates")]
    pub created_at: OffsetDateTime,
    #[serde(with = "dates")]
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContract {
    pub contract_number: String,
    pub contract_name: String,
    pub customer_name: String,
    pub prime_contractor: String,
    pub is_prime: bool,
    pub contract_type: ContractType,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(with = "dates")]
    pub end_date: OffsetDateTime,
    pub total_value: Decimal,
    pub funded_value: Decimal,
    pub standard_full_time_hours: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateContract {
    /// A blank draft running one year from `today`.
    pub fn draft(today: OffsetDateTime) -> Self {
        Self {
            contract_number: String::new(),
            contract_name: String::new(),
            customer_name: String::new(),
            prime_contractor: String::new(),
            is_prime: true,
            contract_type: ContractType::TimeAndMaterials,
            start_date: today,
            end_date: today + Duration::days(365),
            total_value: Decimal::ZERO,
            funded_value: Decimal::ZERO,
            standard_full_time_hours: DEFAULT_FULL_TIME_HOURS,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFunding {
    pub modification_number: String,
    pub funded_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn contract_deserializes_from_backend_shape() {
        let raw = r#"{
            "id": "6f1c",
            "contractNumber": "W91-24-C-0001",
            "contractName": "Logistics Support",
            "customerName": "Army",
            "primeContractor": "Acme",
            "isPrime": true,
            "contractType": "TimeAndMaterials",
            "startDate": "2025-01-01T00:00:00",
            "endDate": "2026-01-01T00:00:00",
            "totalValue": 1000000,
            "fundedValue": 250000.5,
            "standardFullTimeHours": 1912,
            "status": "Active",
            "createdAt": "2024-12-01T10:00:00Z",
            "updatedAt": "2024-12-02T10:00:00Z",
            "isActive": true
        }"#;

        let contract: Contract = serde_json::from_str(raw).unwrap();
        assert_eq!(contract.id.as_str(), "6f1c");
        assert_eq!(contract.contract_type, ContractType::TimeAndMaterials);
        assert_eq!(contract.status, ContractStatus::Active);
        assert_eq!(contract.funded_value, dec!(250000.5));
        assert_eq!(contract.end_date, datetime!(2026-01-01 00:00:00 UTC));
        assert_eq!(contract.description, None);
    }

    #[test]
    fn draft_defaults_match_new_contract_form() {
        let today = datetime!(2025-06-01 00:00:00 UTC);
        let draft = CreateContract::draft(today);
        assert!(draft.is_prime);
        assert_eq!(draft.contract_type, ContractType::TimeAndMaterials);
        assert_eq!(draft.end_date, datetime!(2026-06-01 00:00:00 UTC));
        assert_eq!(draft.standard_full_time_hours, dec!(1912));
    }

    #[test]
    fn lifecycle_guards() {
        assert!(ContractStatus::Draft.can_activate());
        assert!(!ContractStatus::Active.can_activate());
        assert!(ContractStatus::Active.can_close());
        assert!(!ContractStatus::Closed.can_close());
    }
}
