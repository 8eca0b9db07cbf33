use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{dates, AssignmentId, ContractId, FundingWarningLevel, ResourceId};

/// A resource assigned to a contract, with the server's burn and margin figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResource {
    pub id: AssignmentId,
    pub contract_id: ContractId,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub resource_type: String,
    #[serde(default)]
    pub lcat_title: Option<String>,
    pub allocation_percentage: Decimal,
    pub annual_hours: Decimal,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "dates::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub contract_bill_rate_override: Option<Decimal>,
    pub is_active: bool,
    pub pay_rate: Decimal,
    pub burdened_cost: Decimal,
    pub bill_rate: Decimal,
    pub monthly_burn: Decimal,
    pub annual_burn: Decimal,
    pub margin: Decimal,
    pub is_underwater: bool,
}

pub fn total_monthly_burn(assignments: &[ContractResource]) -> Decimal {
    assignments.iter().map(|a| a.monthly_burn).sum()
}

pub fn total_allocation(assignments: &[ContractResource]) -> Decimal {
    assignments.iter().map(|a| a.allocation_percentage).sum()
}

/// Hours a resource is committed for, given its annual hours and allocation.
pub fn remaining_hours(annual_hours: Decimal, allocation_percentage: Decimal) -> Decimal {
    (annual_hours * allocation_percentage / dec!(100))
        .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignResource {
    pub resource_id: ResourceId,
    pub allocation_percentage: Decimal,
    pub annual_hours: Decimal,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dates::option"
    )]
    pub end_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_bill_rate_override: Option<Decimal>,
}

impl AssignResource {
    /// Pre-fill an assignment for a resource picked from the availability list.
    pub fn for_available(
        availability: &ResourceAvailability,
        annual_hours: Decimal,
        start_date: OffsetDateTime,
    ) -> Self {
        Self {
            resource_id: availability.resource_id.clone(),
            allocation_percentage: availability.available_allocation.min(dec!(100)),
            annual_hours,
            start_date,
            end_date: None,
            contract_bill_rate_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation_percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_hours: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dates::option"
    )]
    pub end_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_bill_rate_override: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAvailability {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub current_allocation: Decimal,
    pub available_allocation: Decimal,
    pub is_fully_allocated: bool,
    pub is_on_bench: bool,
    #[serde(default)]
    pub current_contracts: Vec<ContractAllocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAllocation {
    pub contract_id: ContractId,
    pub contract_number: String,
    pub customer_name: String,
    pub allocation_percentage: Decimal,
    #[serde(with = "dates")]
    pub start_date: OffsetDateTime,
    #[serde(default, with = "dates::option")]
    pub end_date: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurnDirection {
    Over,
    Under,
    OnPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractBurnRate {
    pub contract_id: ContractId,
    pub contract_number: String,
    pub total_value: Decimal,
    pub funded_value: Decimal,
    #[serde(default)]
    pub actual_burned_amount: Option<Decimal>,
    pub estimated_monthly_burn: Decimal,
    pub actual_monthly_burn: Decimal,
    pub estimated_annual_burn: Decimal,
    pub actual_annual_burn: Decimal,
    #[serde(default)]
    pub months_until_depletion: Option<Decimal>,
    #[serde(default, with = "dates::option")]
    pub projected_depletion_date: Option<OffsetDateTime>,
    pub funding_warning_level: String,
    pub funding_percentage_used: Decimal,
    pub assigned_resource_count: u32,
    #[serde(default)]
    pub assigned_resources: Vec<ContractResource>,
}

impl ContractBurnRate {
    pub fn warning_level(&self) -> FundingWarningLevel {
        FundingWarningLevel::parse_lenient(&self.funding_warning_level)
    }

    pub fn funding_remaining(&self) -> Decimal {
        self.funded_value - self.actual_burned_amount.unwrap_or_default()
    }

    /// Actual minus estimated monthly burn; positive means over-burning.
    pub fn monthly_delta(&self) -> Decimal {
        self.actual_monthly_burn - self.estimated_monthly_burn
    }

    pub fn burn_direction(&self) -> BurnDirection {
        let delta = self.monthly_delta();
        if delta > Decimal::ZERO {
            BurnDirection::Over
        } else if delta < Decimal::ZERO {
            BurnDirection::Under
        } else {
            BurnDirection::OnPlan
        }
    }

    /// Share of the total value that is funded, in percent.
    pub fn funded_share(&self) -> Decimal {
        super::percent_funded(self.total_value, self.funded_value)
    }

    /// (estimated, actual) bar lengths as fractions of the larger burn.
    pub fn burn_bar_ratios(&self) -> (f64, f64) {
        let max = self.estimated_monthly_burn.max(self.actual_monthly_burn);
        if max <= Decimal::ZERO {
            return (0.0, 0.0);
        }
        let ratio = |v: Decimal| (v / max).to_f64().unwrap_or(0.0).clamp(0.0, 1.0);
        (
            ratio(self.estimated_monthly_burn),
            ratio(self.actual_monthly_burn),
        )
    }
}
