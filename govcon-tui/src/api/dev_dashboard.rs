use std::collections::BTreeMap;

use govcon::domain::{
    AlertId, AlertNotification, AlertSeverity, AlertType, Contract, ContractAllocation,
    ContractBurnRate, ContractDepletion, ContractHealthCard, ContractId, ContractStatus,
    ContractTrend, DashboardMetrics, FinancialProjections, FundingWarningLevel,
    MonthlyProjection, PortfolioHealth, Resource, ResourceAllocation, ResourceAvailability,
    ResourceTypeMetrics, ResourceUtilizationMetrics,
};
use govcon::{GovconError, GovconResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::{Date, Duration, Month, OffsetDateTime};

use super::dev_backend::DevStore;

const DAYS_PER_MONTH: Decimal = dec!(30.44);
const MAX_PROJECTION_DAYS: Decimal = dec!(36500);
const TOP_RESOURCE_COUNT: usize = 5;
const UNDERUTILIZED_BELOW: Decimal = dec!(50);

fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * dec!(100)).round_dp(1)
}

fn depletion_severity(days: i64) -> &'static str {
    match days {
        d if d < 30 => "Critical",
        d if d < 90 => "High",
        d if d < 180 => "Medium",
        _ => "Low",
    }
}

/// First day of the month `offset` months after `from`.
fn month_start(from: Date, offset: u32) -> Option<Date> {
    let index = from.year() * 12 + i32::from(u8::from(from.month())) - 1 + offset as i32;
    let month = Month::try_from((index.rem_euclid(12) + 1) as u8).ok()?;
    Date::from_calendar_date(index.div_euclid(12), month, 1).ok()
}

struct ContractBurn {
    estimated_monthly: Decimal,
    actual_monthly: Decimal,
    burned: Decimal,
    months_until_depletion: Option<Decimal>,
    depletion_date: Option<OffsetDateTime>,
}

impl DevStore {
    fn contract_burn(&self, contract_id: &ContractId) -> Option<ContractBurn> {
        let contract = self.contracts.iter().find(|c| &c.id == contract_id)?;
        let estimated_monthly: Decimal = self
            .active_assignments(contract_id)
            .map(|a| a.monthly_burn)
            .sum();
        let burned = self.burned.get(contract_id).copied().unwrap_or_default();
        let elapsed_days = Decimal::from((self.now - contract.start_date).whole_days().max(0));
        let months_elapsed = (elapsed_days / DAYS_PER_MONTH).max(Decimal::ONE);
        let actual_monthly = (burned / months_elapsed).round_dp(2);

        let pace = if actual_monthly > Decimal::ZERO {
            actual_monthly
        } else {
            estimated_monthly
        };
        let remaining = (contract.funded_value - burned).max(Decimal::ZERO);
        let months_until_depletion =
            (pace > Decimal::ZERO).then(|| (remaining / pace).round_dp(1));
        let depletion_date = months_until_depletion.map(|months| {
            let days = (months * DAYS_PER_MONTH).trunc().min(MAX_PROJECTION_DAYS);
            self.now + Duration::days(i64::try_from(days).unwrap_or_default())
        });

        Some(ContractBurn {
            estimated_monthly,
            actual_monthly,
            burned,
            months_until_depletion,
            depletion_date,
        })
    }

    pub(super) fn burn_rate(&self, contract_id: &ContractId) -> GovconResult<ContractBurnRate> {
        let contract = self
            .contracts
            .iter()
            .find(|c| &c.id == contract_id)
            .ok_or_else(|| GovconError::NotFound("Contract".to_string()))?;
        let burn = self
            .contract_burn(contract_id)
            .ok_or_else(|| GovconError::NotFound("Contract".to_string()))?;
        let assigned: Vec<_> = self.active_assignments(contract_id).cloned().collect();

        Ok(ContractBurnRate {
            contract_id: contract.id.clone(),
            contract_number: contract.contract_number.clone(),
            total_value: contract.total_value,
            funded_value: contract.funded_value,
            actual_burned_amount: Some(burn.burned),
            estimated_monthly_burn: burn.estimated_monthly,
            actual_monthly_burn: burn.actual_monthly,
            estimated_annual_burn: burn.estimated_monthly * dec!(12),
            actual_annual_burn: burn.actual_monthly * dec!(12),
            months_until_depletion: burn.months_until_depletion,
            projected_depletion_date: burn.depletion_date,
            funding_warning_level: contract.funding_warning(self.now).label().to_string(),
            funding_percentage_used: ratio_percent(burn.burned, contract.funded_value),
            assigned_resource_count: assigned.len() as u32,
            assigned_resources: assigned,
        })
    }

    pub(super) fn availability(&self, resource: &Resource) -> ResourceAvailability {
        let current = self.allocation_for(&resource.id);
        let current_contracts = self
            .assignments
            .iter()
            .filter(|a| a.is_active && a.resource_id == resource.id)
            .filter_map(|a| {
                let contract = self.contracts.iter().find(|c| c.id == a.contract_id)?;
                Some(ContractAllocation {
                    contract_id: contract.id.clone(),
                    contract_number: contract.contract_number.clone(),
                    customer_name: contract.customer_name.clone(),
                    allocation_percentage: a.allocation_percentage,
                    start_date: a.start_date,
                    end_date: a.end_date,
                })
            })
            .collect();
        ResourceAvailability {
            resource_id: resource.id.clone(),
            resource_name: resource.full_name.clone(),
            current_allocation: current,
            available_allocation: (dec!(100) - current).max(Decimal::ZERO),
            is_fully_allocated: current >= dec!(100),
            is_on_bench: current.is_zero(),
            current_contracts,
        }
    }

    /// Monthly cost of an assignment at the resource's burdened rate.
    fn monthly_cost(&self, contract_id: &ContractId) -> Decimal {
        self.active_assignments(contract_id)
            .map(|a| a.burdened_cost * a.annual_hours * a.allocation_percentage / dec!(1200))
            .sum::<Decimal>()
            .round_dp(2)
    }

    fn active_contracts(&self) -> impl Iterator<Item = &Contract> {
        self.contracts
            .iter()
            .filter(|c| c.status == ContractStatus::Active)
    }

    pub(super) fn metrics(&self) -> DashboardMetrics {
        let count = |status: ContractStatus| {
            self.contracts.iter().filter(|c| c.status == status).count() as u32
        };
        let live = || self.contracts.iter().filter(|c| c.status != ContractStatus::Closed);
        let levels: Vec<FundingWarningLevel> = self
            .active_contracts()
            .map(|c| c.funding_warning(self.now))
            .collect();
        let critical = levels
            .iter()
            .filter(|l| **l == FundingWarningLevel::Critical)
            .count() as u32;
        let warning = levels
            .iter()
            .filter(|l| matches!(l, FundingWarningLevel::High | FundingWarningLevel::Medium))
            .count() as u32;
        let active = count(ContractStatus::Active);

        let revenue: Decimal = self
            .active_contracts()
            .filter_map(|c| self.contract_burn(&c.id))
            .map(|b| b.estimated_monthly)
            .sum();
        let cost: Decimal = self.active_contracts().map(|c| self.monthly_cost(&c.id)).sum();

        DashboardMetrics {
            total_contract_value: live().map(|c| c.total_value).sum(),
            total_funded_value: live().map(|c| c.funded_value).sum(),
            total_burned_amount: self.burned.values().copied().sum(),
            monthly_burn_rate: revenue,
            quarterly_burn_rate: revenue * dec!(3),
            active_contracts: active,
            draft_contracts: count(ContractStatus::Draft),
            closed_contracts: count(ContractStatus::Closed),
            critical_contracts: critical,
            warning_contracts: warning,
            overall_health: portfolio_health(critical, warning, active),
            projected_monthly_revenue: revenue,
            projected_monthly_profit: revenue - cost,
            calculated_at: self.now,
        }
    }

    pub(super) fn health_cards(&self) -> Vec<ContractHealthCard> {
        self.active_contracts()
            .filter_map(|contract| {
                let burn = self.contract_burn(&contract.id)?;
                let level = contract.funding_warning(self.now);
                let assigned: Vec<_> = self.active_assignments(&contract.id).collect();
                let underwater = assigned.iter().filter(|a| a.is_underwater).count();
                let utilization = if assigned.is_empty() {
                    Decimal::ZERO
                } else {
                    assigned.iter().map(|a| a.allocation_percentage).sum::<Decimal>()
                        / Decimal::from(assigned.len())
                };
                let cost = self.monthly_cost(&contract.id);

                let mut alerts = Vec::new();
                if level >= FundingWarningLevel::High {
                    alerts.push(format!("Funding {}", level.label().to_lowercase()));
                }
                let days = contract.days_remaining(self.now);
                if days < 90 {
                    alerts.push(format!("Ends in {} days", days));
                }
                if underwater > 0 {
                    alerts.push(format!("{} underwater resource(s)", underwater));
                }

                let trend = if burn.actual_monthly > burn.estimated_monthly * dec!(1.1) {
                    ContractTrend::Declining
                } else if burn.actual_monthly < burn.estimated_monthly * dec!(0.9) {
                    ContractTrend::Improving
                } else {
                    ContractTrend::Stable
                };

                Some(ContractHealthCard {
                    contract_id: contract.id.clone(),
                    contract_number: contract.contract_number.clone(),
                    customer_name: contract.customer_name.clone(),
                    prime_contractor_name: contract.prime_contractor.clone(),
                    is_prime: contract.is_prime,
                    status: contract.status,
                    total_value: contract.total_value,
                    funded_value: contract.funded_value,
                    burned_amount: burn.burned,
                    monthly_burn_rate: burn.estimated_monthly,
                    months_until_depletion: burn.months_until_depletion.unwrap_or_default(),
                    projected_depletion_date: burn.depletion_date,
                    warning_level: level,
                    resource_count: assigned.len() as u32,
                    resource_utilization: utilization.round_dp(1),
                    profit_margin: ratio_percent(
                        burn.estimated_monthly - cost,
                        burn.estimated_monthly,
                    ),
                    alerts,
                    trend,
                })
            })
            .collect()
    }

    fn allocation_row(&self, resource: &Resource) -> ResourceAllocation {
        let rows: Vec<_> = self
            .assignments
            .iter()
            .filter(|a| a.is_active && a.resource_id == resource.id)
            .collect();
        ResourceAllocation {
            resource_id: resource.id.clone(),
            resource_name: resource.full_name.clone(),
            lcat_title: resource.lcat_name.clone().unwrap_or_default(),
            total_allocation: rows.iter().map(|a| a.allocation_percentage).sum(),
            contract_count: rows.len() as u32,
            monthly_cost: rows
                .iter()
                .map(|a| a.burdened_cost * a.annual_hours * a.allocation_percentage / dec!(1200))
                .sum::<Decimal>()
                .round_dp(2),
            monthly_revenue: rows.iter().map(|a| a.monthly_burn).sum(),
            is_underwater: resource.is_underwater(),
        }
    }

    pub(super) fn utilization(&self) -> ResourceUtilizationMetrics {
        let active: Vec<&Resource> = self.resources.iter().filter(|r| r.is_active).collect();
        let mut rows: Vec<ResourceAllocation> =
            active.iter().map(|r| self.allocation_row(r)).collect();

        let mut metrics_by_type = BTreeMap::new();
        for resource in &active {
            let kind = resource.resource_type.as_str().to_string();
            let of_kind: Vec<_> = active
                .iter()
                .zip(&rows)
                .filter(|(r, _)| r.resource_type == resource.resource_type)
                .collect();
            let n = Decimal::from(of_kind.len());
            let avg = |f: &dyn Fn(&Resource) -> Decimal| {
                (of_kind.iter().map(|(r, _)| f(r)).sum::<Decimal>() / n).round_dp(2)
            };
            metrics_by_type.entry(kind.clone()).or_insert_with(|| ResourceTypeMetrics {
                resource_type: kind,
                count: of_kind.len() as u32,
                average_cost: avg(&|r| r.burdened_cost),
                average_revenue: avg(&|r| r.bill_rate.unwrap_or_default()),
                average_margin: avg(&|r| r.computed_margin().unwrap_or_default()),
                utilization_percentage: (of_kind
                    .iter()
                    .map(|(_, row)| row.total_allocation)
                    .sum::<Decimal>()
                    / n)
                    .round_dp(1),
            });
        }

        let total_allocation: Decimal = rows.iter().map(|r| r.total_allocation).sum();
        let average_utilization = if rows.is_empty() {
            Decimal::ZERO
        } else {
            (total_allocation / Decimal::from(rows.len())).round_dp(1)
        };
        let summary = ResourceUtilizationMetrics {
            total_resources: self.resources.len() as u32,
            active_resources: active.len() as u32,
            bench_resources: rows.iter().filter(|r| r.total_allocation.is_zero()).count() as u32,
            underwater_resources: active.iter().filter(|r| r.is_underwater()).count() as u32,
            average_utilization,
            total_monthly_cost: rows.iter().map(|r| r.monthly_cost).sum(),
            total_monthly_revenue: rows.iter().map(|r| r.monthly_revenue).sum(),
            metrics_by_type,
            top_utilized_resources: Vec::new(),
            underutilized_resources: rows
                .iter()
                .filter(|r| r.total_allocation < UNDERUTILIZED_BELOW)
                .take(TOP_RESOURCE_COUNT)
                .cloned()
                .collect(),
        };
        rows.sort_by(|a, b| b.total_allocation.cmp(&a.total_allocation));
        rows.truncate(TOP_RESOURCE_COUNT);
        ResourceUtilizationMetrics {
            top_utilized_resources: rows,
            ..summary
        }
    }

    pub(super) fn projections(&self, months: u32) -> FinancialProjections {
        let today = self.now.date();
        let contracts: Vec<_> = self
            .active_contracts()
            .filter_map(|c| Some((c, self.contract_burn(&c.id)?, self.monthly_cost(&c.id))))
            .collect();

        let mut projections = Vec::new();
        let (mut cumulative_revenue, mut cumulative_cost) = (Decimal::ZERO, Decimal::ZERO);
        for offset in 0..months {
            let (Some(start), Some(end)) =
                (month_start(today, offset), month_start(today, offset + 1))
            else {
                break;
            };
            let in_month = |d: OffsetDateTime| d.date() >= start && d.date() < end;
            let running: Vec<_> = contracts
                .iter()
                .filter(|(c, _, _)| c.end_date.date() >= start)
                .collect();
            let revenue: Decimal = running.iter().map(|(_, b, _)| b.estimated_monthly).sum();
            let cost: Decimal = running.iter().map(|(_, _, cost)| *cost).sum();
            cumulative_revenue += revenue;
            cumulative_cost += cost;
            projections.push(MonthlyProjection {
                month: format!("{}-{:02}", start.year(), u8::from(start.month())),
                projected_revenue: revenue,
                projected_cost: cost,
                projected_profit: revenue - cost,
                cumulative_revenue,
                cumulative_cost,
                active_contract_count: running.len() as u32,
                expiring_contracts: contracts
                    .iter()
                    .filter(|(c, _, _)| in_month(c.end_date))
                    .map(|(c, _, _)| c.contract_number.clone())
                    .collect(),
                depleting_contracts: contracts
                    .iter()
                    .filter(|(_, b, _)| b.depletion_date.is_some_and(in_month))
                    .map(|(c, _, _)| c.contract_number.clone())
                    .collect(),
            });
        }

        let mut depletion_schedule: Vec<ContractDepletion> = contracts
            .iter()
            .filter_map(|(c, b, _)| {
                let date = b.depletion_date?;
                let days = (date - self.now).whole_days();
                Some(ContractDepletion {
                    contract_id: c.id.clone(),
                    contract_number: c.contract_number.clone(),
                    estimated_depletion_date: date,
                    remaining_funds: (c.funded_value - b.burned).max(Decimal::ZERO),
                    days_until_depletion: days,
                    impact_severity: depletion_severity(days).to_string(),
                })
            })
            .collect();
        depletion_schedule.sort_by_key(|d| d.days_until_depletion);

        FinancialProjections {
            total_projected_revenue: cumulative_revenue,
            total_projected_cost: cumulative_cost,
            total_projected_profit: cumulative_revenue - cumulative_cost,
            months_projected: projections.len() as u32,
            projections,
            depletion_schedule,
            projection_date: self.now,
        }
    }

    pub(super) fn alerts(&self) -> Vec<AlertNotification> {
        let mut alerts = Vec::new();
        let mut push = |alert_type, severity, title: String, message: String, entity: &str, id: &str| {
            alerts.push(AlertNotification {
                id: AlertId::new(format!("alert-{}", alerts.len() + 1)),
                alert_type,
                severity,
                title,
                message,
                entity_type: entity.to_string(),
                entity_id: Some(id.to_string()),
                created_at: self.now,
                metadata: None,
            });
        };

        for contract in self.active_contracts() {
            let level = contract.funding_warning(self.now);
            let (alert_type, severity) = match level {
                FundingWarningLevel::Critical => (AlertType::FundingCritical, AlertSeverity::Critical),
                FundingWarningLevel::High => (AlertType::FundingWarning, AlertSeverity::High),
                FundingWarningLevel::Medium => (AlertType::FundingWarning, AlertSeverity::Warning),
                FundingWarningLevel::Low | FundingWarningLevel::None => {
                    (AlertType::FundingWarning, AlertSeverity::Info)
                }
            };
            if level >= FundingWarningLevel::Medium {
                push(
                    alert_type,
                    severity,
                    format!("{} funding {}", contract.contract_number, level.label().to_lowercase()),
                    format!(
                        "{:.1}% funded with {} days remaining",
                        contract.percent_funded(),
                        contract.days_remaining(self.now)
                    ),
                    "Contract",
                    contract.id.as_str(),
                );
            }
            let days = contract.days_remaining(self.now);
            if (0..90).contains(&days) {
                push(
                    AlertType::ContractExpiring,
                    if days < 30 { AlertSeverity::High } else { AlertSeverity::Warning },
                    format!("{} expiring", contract.contract_number),
                    format!("Period of performance ends in {} days", days),
                    "Contract",
                    contract.id.as_str(),
                );
            }
        }

        for resource in self.resources.iter().filter(|r| r.is_active) {
            let allocation = self.allocation_for(&resource.id);
            if resource.is_underwater() {
                push(
                    AlertType::ResourceUnderwater,
                    AlertSeverity::High,
                    format!("{} is underwater", resource.full_name),
                    "Burdened cost exceeds bill rate".to_string(),
                    "Resource",
                    resource.id.as_str(),
                );
            }
            if allocation > dec!(100) {
                push(
                    AlertType::OverAllocation,
                    AlertSeverity::Warning,
                    format!("{} is over-allocated", resource.full_name),
                    format!("Allocated {}% across contracts", allocation.normalize()),
                    "Resource",
                    resource.id.as_str(),
                );
            } else if allocation.is_zero() {
                push(
                    AlertType::UnderUtilization,
                    AlertSeverity::Info,
                    format!("{} is on the bench", resource.full_name),
                    "No active contract assignments".to_string(),
                    "Resource",
                    resource.id.as_str(),
                );
            }
        }

        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
        alerts
    }
}

fn portfolio_health(critical: u32, warning: u32, active: u32) -> PortfolioHealth {
    if active == 0 || (critical == 0 && warning == 0) {
        return PortfolioHealth::Excellent;
    }
    if critical == 0 {
        return PortfolioHealth::Good;
    }
    let share = Decimal::from(critical) / Decimal::from(active);
    if share < dec!(0.25) {
        PortfolioHealth::Fair
    } else if share < dec!(0.5) {
        PortfolioHealth::Poor
    } else {
        PortfolioHealth::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dev_seed::seed_store;
    use govcon::domain::urgent_alerts;
    use time::macros::{date, datetime};

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00:00 UTC);

    #[test]
    fn month_start_rolls_over_years() {
        assert_eq!(month_start(date!(2025 - 11 - 17), 0), Some(date!(2025 - 11 - 01)));
        assert_eq!(month_start(date!(2025 - 11 - 17), 2), Some(date!(2026 - 01 - 01)));
    }

    #[test]
    fn metrics_count_contracts_by_status() {
        let store = seed_store(NOW);
        let metrics = store.metrics();
        assert_eq!(metrics.active_contracts, 3);
        assert_eq!(metrics.draft_contracts, 1);
        assert_eq!(metrics.closed_contracts, 1);
        assert_eq!(metrics.critical_contracts, 1);
        assert_eq!(metrics.warning_contracts, 1);
        assert_eq!(metrics.overall_health, PortfolioHealth::Poor);
    }

    #[test]
    fn burn_rate_reports_pace_and_warning() {
        let store = seed_store(NOW);
        let burn = store.burn_rate(&ContractId::new("c-1")).unwrap();
        assert_eq!(burn.warning_level(), FundingWarningLevel::Medium);
        assert_eq!(burn.assigned_resource_count, 3);
        assert_eq!(burn.funding_percentage_used, dec!(75.0));
        assert!(burn.months_until_depletion.is_some());
        assert!(matches!(
            store.burn_rate(&ContractId::new("c-404")),
            Err(GovconError::NotFound(_))
        ));
    }

    #[test]
    fn health_cards_only_cover_active_contracts() {
        let store = seed_store(NOW);
        let cards = store.health_cards();
        assert_eq!(cards.len(), 3);
        let c2 = cards.iter().find(|c| c.contract_id.as_str() == "c-2").unwrap();
        assert_eq!(c2.warning_level, FundingWarningLevel::Critical);
        assert_eq!(c2.alerts[0], "Funding critical");
        assert_eq!(c2.alerts[1], "Ends in 45 days");
    }

    #[test]
    fn utilization_flags_bench_and_underwater() {
        let store = seed_store(NOW);
        let metrics = store.utilization();
        assert_eq!(metrics.total_resources, 7);
        assert_eq!(metrics.active_resources, 6);
        assert_eq!(metrics.bench_resources, 1);
        assert_eq!(metrics.underwater_resources, 1);
        assert_eq!(metrics.top_utilized_resources[0].resource_id.as_str(), "r-2");
        assert!(metrics.metrics_by_type.contains_key("W2Internal"));
    }

    #[test]
    fn projections_cover_requested_months() {
        let store = seed_store(NOW);
        let projections = store.projections(6);
        assert_eq!(projections.months_projected, 6);
        assert_eq!(projections.projections[0].month, "2025-06");
        // c-2 ends 45 days out, in July.
        assert_eq!(
            projections.projections[1].expiring_contracts,
            vec!["FA8650-23-D-1104".to_string()]
        );
        let days: Vec<_> = projections
            .depletion_schedule
            .iter()
            .map(|d| d.days_until_depletion)
            .collect();
        assert!(days.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn alerts_are_sorted_most_severe_first() {
        let store = seed_store(NOW);
        let alerts = store.alerts();
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!(alerts.windows(2).all(|w| w[0].severity >= w[1].severity));
        assert!(alerts
            .iter()
            .any(|a| a.alert_type == AlertType::ResourceUnderwater));
        assert!(urgent_alerts(&alerts).len() <= 5);
    }
}
