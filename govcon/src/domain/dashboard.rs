use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{dates, AlertId, ContractId, ContractStatus, FundingWarningLevel, ResourceId};

/// How many urgent alerts the dashboard strip shows.
pub const URGENT_ALERT_LIMIT: usize = 5;
/// How many depletion rows the projections tab shows.
pub const DEPLETION_PREVIEW_LIMIT: usize = 10;
/// How many alerts a contract health card previews.
pub const CARD_ALERT_PREVIEW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortfolioHealth {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContractTrend {
    Improving,
    #[default]
    Stable,
    Declining,
}

impl ContractTrend {
    pub fn marker(&self) -> &'static str {
        match self {
            ContractTrend::Improving => "▲",
            ContractTrend::Stable => "▶",
            ContractTrend::Declining => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    FundingCritical,
    FundingWarning,
    ResourceUnderwater,
    ContractExpiring,
    OverAllocation,
    UnderUtilization,
    AnomalyDetected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertSeverity {
    Info,
    Warning,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn is_urgent(&self) -> bool {
        matches!(self, AlertSeverity::Critical | AlertSeverity::High)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_contract_value: Decimal,
    pub total_funded_value: Decimal,
    pub total_burned_amount: Decimal,
    pub monthly_burn_rate: Decimal,
    pub quarterly_burn_rate: Decimal,
    pub active_contracts: u32,
    pub draft_contracts: u32,
    pub closed_contracts: u32,
    pub critical_contracts: u32,
    pub warning_contracts: u32,
    pub overall_health: PortfolioHealth,
    pub projected_monthly_revenue: Decimal,
    pub projected_monthly_profit: Decimal,
    #[serde(with = "dates")]
    pub calculated_at: OffsetDateTime,
}

impl DashboardMetrics {
    /// Funded share of the portfolio's total value, in percent.
    pub fn funded_ratio(&self) -> Decimal {
        super::percent_funded(self.total_contract_value, self.total_funded_value)
    }

    /// Contract counts by status, in display order.
    pub fn status_distribution(&self) -> [(ContractStatus, u32); 3] {
        [
            (ContractStatus::Active, self.active_contracts),
            (ContractStatus::Draft, self.draft_contracts),
            (ContractStatus::Closed, self.closed_contracts),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractHealthCard {
    pub contract_id: ContractId,
    pub contract_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub prime_contractor_name: String,
    pub is_prime: bool,
    pub status: ContractStatus,
    pub total_value: Decimal,
    pub funded_value: Decimal,
    pub burned_amount: Decimal,
    pub monthly_burn_rate: Decimal,
    pub months_until_depletion: Decimal,
    #[serde(default, with = "dates::option")]
    pub projected_depletion_date: Option<OffsetDateTime>,
    pub warning_level: FundingWarningLevel,
    pub resource_count: u32,
    pub resource_utilization: Decimal,
    pub profit_margin: Decimal,
    #[serde(default)]
    pub alerts: Vec<String>,
    #[serde(default)]
    pub trend: ContractTrend,
}

impl ContractHealthCard {
    pub fn alert_preview(&self) -> &[String] {
        &self.alerts[..self.alerts.len().min(CARD_ALERT_PREVIEW)]
    }

    pub fn burned_ratio(&self) -> Decimal {
        super::percent_funded(self.funded_value, self.burned_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUtilizationMetrics {
    pub total_resources: u32,
    pub active_resources: u32,
    pub bench_resources: u32,
    pub underwater_resources: u32,
    pub average_utilization: Decimal,
    pub total_monthly_cost: Decimal,
    pub total_monthly_revenue: Decimal,
    #[serde(default)]
    pub metrics_by_type: BTreeMap<String, ResourceTypeMetrics>,
    #[serde(default)]
    pub top_utilized_resources: Vec<ResourceAllocation>,
    #[serde(default)]
    pub underutilized_resources: Vec<ResourceAllocation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeMetrics {
    pub resource_type: String,
    pub count: u32,
    pub average_cost: Decimal,
    pub average_revenue: Decimal,
    pub average_margin: Decimal,
    pub utilization_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    pub resource_id: ResourceId,
    pub resource_name: String,
    #[serde(default)]
    pub lcat_title: String,
    pub total_allocation: Decimal,
    pub contract_count: u32,
    pub monthly_cost: Decimal,
    pub monthly_revenue: Decimal,
    pub is_underwater: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProjections {
    #[serde(default)]
    pub projections: Vec<MonthlyProjection>,
    pub total_projected_revenue: Decimal,
    pub total_projected_cost: Decimal,
    pub total_projected_profit: Decimal,
    #[serde(default)]
    pub depletion_schedule: Vec<ContractDepletion>,
    #[serde(with = "dates")]
    pub projection_date: OffsetDateTime,
    pub months_projected: u32,
}

impl FinancialProjections {
    pub fn depletion_preview(&self) -> &[ContractDepletion] {
        let n = self.depletion_schedule.len().min(DEPLETION_PREVIEW_LIMIT);
        &self.depletion_schedule[..n]
    }

    pub fn months_with_expirations(&self) -> Vec<&MonthlyProjection> {
        self.projections
            .iter()
            .filter(|p| !p.expiring_contracts.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    pub month: String,
    pub projected_revenue: Decimal,
    pub projected_cost: Decimal,
    pub projected_profit: Decimal,
    pub cumulative_revenue: Decimal,
    pub cumulative_cost: Decimal,
    pub active_contract_count: u32,
    #[serde(default)]
    pub expiring_contracts: Vec<String>,
    #[serde(default)]
    pub depleting_contracts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDepletion {
    pub contract_id: ContractId,
    pub contract_number: String,
    #[serde(with = "dates")]
    pub estimated_depletion_date: OffsetDateTime,
    pub remaining_funds: Decimal,
    pub days_until_depletion: i64,
    pub impact_severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotification {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub entity_type: String,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(with = "dates")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Critical and high severity alerts, in server order, capped for the alert strip.
pub fn urgent_alerts(alerts: &[AlertNotification]) -> Vec<&AlertNotification> {
    alerts
        .iter()
        .filter(|a| a.severity.is_urgent())
        .take(URGENT_ALERT_LIMIT)
        .collect()
}

/// Everything the dashboard needs in one round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteDashboard {
    pub metrics: DashboardMetrics,
    pub contracts: Vec<ContractHealthCard>,
    pub resources: ResourceUtilizationMetrics,
    pub alerts: Vec<AlertNotification>,
    #[serde(with = "dates")]
    pub timestamp: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    fn alert(id: &str, severity: AlertSeverity) -> AlertNotification {
        AlertNotification {
            id: AlertId::new(id),
            alert_type: AlertType::FundingWarning,
            severity,
            title: format!("alert {}", id),
            message: String::new(),
            entity_type: "Contract".to_string(),
            entity_id: None,
            created_at: datetime!(2025-01-01 00:00:00 UTC),
            metadata: None,
        }
    }

    #[test]
    fn urgent_alerts_keep_order_and_cap() {
        let alerts: Vec<_> = (0..8)
            .map(|i| {
                let severity = if i % 2 == 0 {
                    AlertSeverity::Critical
                } else {
                    AlertSeverity::Info
                };
                alert(&i.to_string(), severity)
            })
            .chain([
                alert("h1", AlertSeverity::High),
                alert("h2", AlertSeverity::High),
            ])
            .collect();

        let urgent = urgent_alerts(&alerts);
        let ids: Vec<&str> = urgent.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "2", "4", "6", "h1"]);
    }

    #[test]
    fn alert_type_field_is_named_type() {
        let raw = r#"{
            "id": "a-1",
            "type": "ResourceUnderwater",
            "severity": "High",
            "title": "Underwater",
            "message": "2 resources",
            "entityType": "Resource",
            "createdAt": "2025-01-01T00:00:00Z",
            "metadata": { "count": 2 }
        }"#;
        let alert: AlertNotification = serde_json::from_str(raw).unwrap();
        assert_eq!(alert.alert_type, AlertType::ResourceUnderwater);
        assert!(alert.severity.is_urgent());
        assert_eq!(alert.entity_id, None);
    }

    #[test]
    fn projections_selectors() {
        let month = |name: &str, expiring: &[&str]| MonthlyProjection {
            month: name.to_string(),
            projected_revenue: dec!(10),
            projected_cost: dec!(8),
            projected_profit: dec!(2),
            cumulative_revenue: dec!(10),
            cumulative_cost: dec!(8),
            active_contract_count: 1,
            expiring_contracts: expiring.iter().map(|s| s.to_string()).collect(),
            depleting_contracts: vec![],
        };
        let depletion = |i: usize| ContractDepletion {
            contract_id: ContractId::new(format!("c-{}", i)),
            contract_number: format!("N-{}", i),
            estimated_depletion_date: datetime!(2025-06-01 00:00:00 UTC),
            remaining_funds: dec!(1000),
            days_until_depletion: i as i64,
            impact_severity: "High".to_string(),
        };
        let projections = FinancialProjections {
            projections: vec![month("2025-01", &[]), month("2025-02", &["N-1"])],
            total_projected_revenue: dec!(20),
            total_projected_cost: dec!(16),
            total_projected_profit: dec!(4),
            depletion_schedule: (0..14).map(depletion).collect(),
            projection_date: datetime!(2025-01-01 00:00:00 UTC),
            months_projected: 2,
        };

        assert_eq!(projections.depletion_preview().len(), 10);
        let expiring = projections.months_with_expirations();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].month, "2025-02");
    }

    #[test]
    fn funded_ratio_guards_empty_portfolio() {
        let metrics = DashboardMetrics {
            total_contract_value: Decimal::ZERO,
            total_funded_value: Decimal::ZERO,
            total_burned_amount: Decimal::ZERO,
            monthly_burn_rate: Decimal::ZERO,
            quarterly_burn_rate: Decimal::ZERO,
            active_contracts: 0,
            draft_contracts: 0,
            closed_contracts: 0,
            critical_contracts: 0,
            warning_contracts: 0,
            overall_health: PortfolioHealth::Good,
            projected_monthly_revenue: Decimal::ZERO,
            projected_monthly_profit: Decimal::ZERO,
            calculated_at: datetime!(2025-01-01 00:00:00 UTC),
        };
        assert_eq!(metrics.funded_ratio(), Decimal::ZERO);
    }
}
