use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Contract;

const MILLIS_PER_DAY: i128 = 86_400_000;

/// How urgently a contract needs more funding. Variants are ordered by
/// severity, so `Critical > High > ... > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FundingWarningLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl FundingWarningLevel {
    pub fn label(&self) -> &'static str {
        match self {
            FundingWarningLevel::None => "None",
            FundingWarningLevel::Low => "Low",
            FundingWarningLevel::Medium => "Medium",
            FundingWarningLevel::High => "High",
            FundingWarningLevel::Critical => "Critical",
        }
    }

    /// Parse the free-form level string used by the burn-rate endpoint.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => FundingWarningLevel::Critical,
            "high" => FundingWarningLevel::High,
            "medium" => FundingWarningLevel::Medium,
            "low" => FundingWarningLevel::Low,
            _ => FundingWarningLevel::None,
        }
    }
}

impl std::fmt::Display for FundingWarningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Share of the total contract value that has been funded, in percent.
/// Zero when the contract has no total value.
pub fn percent_funded(total_value: Decimal, funded_value: Decimal) -> Decimal {
    if total_value.is_zero() {
        return Decimal::ZERO;
    }
    funded_value / total_value * dec!(100)
}

/// Whole days from `now` until `end`, rounded down. Negative once `end` has passed.
pub fn days_remaining(end: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let millis = (end - now).whole_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) as i64
}

/// Threshold table: the first band that either value falls into wins.
pub fn classify_funding(percent_funded: Decimal, days_remaining: i64) -> FundingWarningLevel {
    if percent_funded < dec!(20) || days_remaining < 30 {
        return FundingWarningLevel::Critical;
    }
    if percent_funded < dec!(40) || days_remaining < 60 {
        return FundingWarningLevel::High;
    }
    if percent_funded < dec!(60) || days_remaining < 90 {
        return FundingWarningLevel::Medium;
    }
    if percent_funded < dec!(80) {
        return FundingWarningLevel::Low;
    }
    FundingWarningLevel::None
}

pub fn calculate_funding_warning(contract: &Contract, now: OffsetDateTime) -> FundingWarningLevel {
    classify_funding(
        percent_funded(contract.total_value, contract.funded_value),
        days_remaining(contract.end_date, now),
    )
}

impl Contract {
    pub fn percent_funded(&self) -> Decimal {
        percent_funded(self.total_value, self.funded_value)
    }

    pub fn days_remaining(&self, now: OffsetDateTime) -> i64 {
        days_remaining(self.end_date, now)
    }

    pub fn funding_warning(&self, now: OffsetDateTime) -> FundingWarningLevel {
        calculate_funding_warning(self, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContractId, ContractStatus, ContractType};
    use time::macros::datetime;
    use time::Duration;

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00:00 UTC);

    fn contract(total: Decimal, funded: Decimal, days_out: i64) -> Contract {
        Contract {
            id: ContractId::new("c-1"),
            contract_number: "N00024-25-C-1234".to_string(),
            contract_name: "Fleet Readiness".to_string(),
            customer_name: "NAVSEA".to_string(),
            prime_contractor: "Acme".to_string(),
            is_prime: true,
            contract_type: ContractType::CostPlus,
            start_date: NOW - Duration::days(200),
            end_date: NOW + Duration::days(days_out),
            total_value: total,
            funded_value: funded,
            standard_full_time_hours: dec!(1912),
            description: None,
            status: ContractStatus::Active,
            created_at: NOW,
            updated_at: NOW,
            is_active: true,
        }
    }

    #[test]
    fn underfunded_contract_is_critical() {
        let c = contract(dec!(100000), dec!(15000), 40);
        assert_eq!(c.funding_warning(NOW), FundingWarningLevel::Critical);
    }

    #[test]
    fn half_funded_with_runway_is_medium() {
        let c = contract(dec!(100000), dec!(50000), 100);
        assert_eq!(c.funding_warning(NOW), FundingWarningLevel::Medium);
    }

    #[test]
    fn mostly_funded_with_runway_is_low() {
        let c = contract(dec!(100000), dec!(70000), 100);
        assert_eq!(c.funding_warning(NOW), FundingWarningLevel::Low);
    }

    #[test]
    fn fully_funded_with_runway_is_none() {
        let c = contract(dec!(100000), dec!(90000), 365);
        assert_eq!(c.funding_warning(NOW), FundingWarningLevel::None);
    }

    #[test]
    fn short_runway_overrides_funding() {
        assert_eq!(
            contract(dec!(100), dec!(100), 10).funding_warning(NOW),
            FundingWarningLevel::Critical
        );
        assert_eq!(
            contract(dec!(100), dec!(100), 45).funding_warning(NOW),
            FundingWarningLevel::High
        );
        assert_eq!(
            contract(dec!(100), dec!(100), 75).funding_warning(NOW),
            FundingWarningLevel::Medium
        );
    }

    #[test]
    fn zero_total_value_counts_as_unfunded() {
        let c = contract(Decimal::ZERO, dec!(5000), 365);
        assert_eq!(c.percent_funded(), Decimal::ZERO);
        assert_eq!(c.funding_warning(NOW), FundingWarningLevel::Critical);
    }

    #[test]
    fn days_remaining_floors_partial_days() {
        let end = NOW + Duration::hours(36);
        assert_eq!(days_remaining(end, NOW), 1);
        let past = NOW - Duration::hours(1);
        assert_eq!(days_remaining(past, NOW), -1);
        assert_eq!(days_remaining(NOW, NOW), 0);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify_funding(dec!(20), 365), FundingWarningLevel::High);
        assert_eq!(classify_funding(dec!(80), 365), FundingWarningLevel::None);
        assert_eq!(classify_funding(dec!(100), 30), FundingWarningLevel::High);
        assert_eq!(classify_funding(dec!(100), 90), FundingWarningLevel::None);
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(FundingWarningLevel::Critical > FundingWarningLevel::High);
        assert!(FundingWarningLevel::Low > FundingWarningLevel::None);
    }

    #[test]
    fn lenient_parse_ignores_case() {
        assert_eq!(
            FundingWarningLevel::parse_lenient("CRITICAL"),
            FundingWarningLevel::Critical
        );
        assert_eq!(
            FundingWarningLevel::parse_lenient("whatever"),
            FundingWarningLevel::None
        );
    }
}
