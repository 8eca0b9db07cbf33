use crate::config::GovconConfig;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use govcon::ApiLog;
use govcon::domain::{
    Contract, ContractBurnRate, ContractResource, Lcat, LcatId, Resource, ResourceFilters,
    ResourceId,
};
use std::collections::BTreeMap;
use std::time::Duration;

mod forms;
mod navigation;
mod pending;
mod state;
pub use forms::{parse_amount, FormField, FormKind, FormState, FormSubmission};
pub use state::{
    ConfirmAction, ConfirmState, CostAnalysis, DashboardState, DashboardTab, PendingRate,
    RefreshPoll, TextInput, View,
};

/// Contract detail view: the contract, its assignments and burn rate.
#[derive(Debug, Clone)]
pub struct ContractDetail {
    pub contract: Contract,
    pub assignments: Vec<ContractResource>,
    pub burn: Option<ContractBurnRate>,
    pub selected: usize,
}

impl ContractDetail {
    pub fn selected_assignment(&self) -> Option<&ContractResource> {
        self.assignments.get(self.selected)
    }
}

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub status_message: Option<String>,
    pub backend_label: String,
    /// Shared with the backend; the API log view reads it live.
    pub api_log: ApiLog,

    // Loading indicator
    pub is_loading: bool,
    pub throbber_state: throbber_widgets_tui::ThrobberState,
    /// Set while a mutation is awaited; a second submit is refused.
    pub submitting: bool,

    pub dashboard: DashboardState,
    pub refresh_interval: Duration,
    pub projection_months: u32,

    pub contracts: Vec<Contract>,
    pub contract_index: usize,
    pub detail: Option<ContractDetail>,

    pub resources: Vec<Resource>,
    pub resource_index: usize,
    pub resource_filters: ResourceFilters,
    pub underwater_only: bool,

    pub lcats: Vec<Lcat>,
    pub lcat_index: usize,

    // Search box shared by the list views
    pub search_input: TextInput,
    pub search_active: bool,

    pub pending_resource_rates: BTreeMap<ResourceId, PendingRate>,
    pub pending_lcat_rates: BTreeMap<LcatId, PendingRate>,

    // Overlays, topmost first
    pub confirm: Option<ConfirmState>,
    pub form: Option<FormState>,
    pub cost_analysis: Option<CostAnalysis>,
}

impl App {
    pub fn new(cfg: &GovconConfig, backend_label: impl Into<String>) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            status_message: None,
            backend_label: backend_label.into(),
            api_log: ApiLog::default(),
            is_loading: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            submitting: false,
            dashboard: DashboardState::new(cfg.auto_refresh),
            refresh_interval: cfg.refresh_interval(),
            projection_months: cfg.projection_months,
            contracts: Vec::new(),
            contract_index: 0,
            detail: None,
            resources: Vec::new(),
            resource_index: 0,
            resource_filters: ResourceFilters::default(),
            underwater_only: false,
            lcats: Vec::new(),
            lcat_index: 0,
            search_input: TextInput::new(),
            search_active: false,
            pending_resource_rates: BTreeMap::new(),
            pending_lcat_rates: BTreeMap::new(),
            confirm: None,
            form: None,
            cost_analysis: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn has_overlay(&self) -> bool {
        self.confirm.is_some() || self.form.is_some() || self.cost_analysis.is_some()
    }

    /// Switch views. Leaving the dashboard cancels its background load.
    pub fn navigate_to(&mut self, view: View) {
        if self.current_view == View::Dashboard && view != View::Dashboard {
            self.dashboard.cancel();
        }
        if view != self.current_view {
            self.search_input.clear();
            self.search_active = false;
        }
        self.current_view = view;
    }

    pub fn open_form(&mut self, form: FormState) {
        self.form = Some(form);
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub fn open_confirm(&mut self, action: ConfirmAction, title: &str, detail: String) {
        self.confirm = Some(ConfirmState {
            action,
            title: title.to_string(),
            detail,
        });
    }

    /// Contracts in display order: all of them, or fuzzy matches best first.
    pub fn visible_contracts(&self) -> Vec<&Contract> {
        let query = self.search_input.trimmed();
        if query.is_empty() {
            return self.contracts.iter().collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(&Contract, i64)> = self
            .contracts
            .iter()
            .filter_map(|c| {
                let haystack = format!(
                    "{} {} {}",
                    c.contract_number, c.contract_name, c.customer_name
                );
                matcher.fuzzy_match(&haystack, query).map(|score| (c, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(c, _)| c).collect()
    }

    pub fn selected_contract(&self) -> Option<&Contract> {
        self.visible_contracts().get(self.contract_index).copied()
    }

    /// Resources after the local underwater toggle; the rest is filtered server-side.
    pub fn visible_resources(&self) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| !self.underwater_only || r.is_underwater())
            .collect()
    }

    pub fn selected_resource(&self) -> Option<&Resource> {
        self.visible_resources().get(self.resource_index).copied()
    }

    pub fn visible_lcats(&self) -> Vec<&Lcat> {
        let query = self.search_input.trimmed();
        if query.is_empty() {
            return self.lcats.iter().collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(&Lcat, i64)> = self
            .lcats
            .iter()
            .filter_map(|l| {
                let haystack = format!("{} {}", l.name, l.position_titles.join(" "));
                matcher.fuzzy_match(&haystack, query).map(|score| (l, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(l, _)| l).collect()
    }

    pub fn selected_lcat(&self) -> Option<&Lcat> {
        self.visible_lcats().get(self.lcat_index).copied()
    }

    pub fn set_contracts(&mut self, contracts: Vec<Contract>) {
        self.contracts = contracts;
        self.contract_index = self
            .contract_index
            .min(self.visible_contracts().len().saturating_sub(1));
    }

    pub fn set_resources(&mut self, resources: Vec<Resource>) {
        self.resources = resources;
        self.resource_index = self
            .resource_index
            .min(self.visible_resources().len().saturating_sub(1));
    }

    pub fn set_lcats(&mut self, lcats: Vec<Lcat>) {
        self.lcats = lcats;
        self.lcat_index = self
            .lcat_index
            .min(self.visible_lcats().len().saturating_sub(1));
    }

    pub fn search_input_char(&mut self, c: char) {
        self.search_input.insert(c);
        self.reset_selection();
    }

    pub fn search_input_backspace(&mut self) {
        self.search_input.backspace();
        self.reset_selection();
    }

    pub fn search_input_clear(&mut self) {
        self.search_input.clear();
        self.reset_selection();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use govcon::domain::{ContractId, ContractStatus, ContractType, ResourceType};
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    pub fn app() -> App {
        App::new(&GovconConfig::default(), "test")
    }

    pub fn contract(id: &str, number: &str, name: &str) -> Contract {
        Contract {
            id: ContractId::new(id),
            contract_number: number.to_string(),
            contract_name: name.to_string(),
            customer_name: "NAVSEA".to_string(),
            prime_contractor: String::new(),
            is_prime: true,
            contract_type: ContractType::FixedPrice,
            start_date: datetime!(2025-01-01 00:00:00 UTC),
            end_date: datetime!(2026-01-01 00:00:00 UTC),
            total_value: dec!(100000),
            funded_value: dec!(50000),
            standard_full_time_hours: dec!(1912),
            description: None,
            status: ContractStatus::Active,
            created_at: datetime!(2025-01-01 00:00:00 UTC),
            updated_at: datetime!(2025-01-01 00:00:00 UTC),
            is_active: true,
        }
    }

    pub fn resource(id: &str, name: &str, bill_rate: Option<rust_decimal::Decimal>) -> Resource {
        let burdened = govcon::domain::burdened_cost(dec!(50), ResourceType::W2Internal);
        Resource {
            id: ResourceId::new(id),
            first_name: name.to_string(),
            last_name: String::new(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            resource_type: ResourceType::W2Internal,
            lcat_id: LcatId::new("l-1"),
            lcat_name: None,
            contract_id: None,
            contract_name: None,
            hourly_rate: dec!(50),
            annual_salary: None,
            burdened_cost: burdened,
            bill_rate,
            margin: govcon::domain::margin(bill_rate, burdened),
            start_date: datetime!(2024-01-01 00:00:00 UTC),
            end_date: None,
            is_active: true,
            created_date: None,
            created_by: None,
            fixed_price_amount: None,
            fixed_price_hours: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fuzzy_search_ranks_contract_matches() {
        let mut app = app();
        app.set_contracts(vec![
            contract("c-1", "W91-0012", "Logistics Modernization"),
            contract("c-2", "FA86-1104", "Sensor Analytics"),
        ]);
        for c in "sensor".chars() {
            app.search_input_char(c);
        }
        let visible = app.visible_contracts();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "c-2");
        assert_eq!(app.selected_contract().map(|c| c.id.as_str()), Some("c-2"));
    }

    #[test]
    fn underwater_toggle_filters_locally() {
        let mut app = app();
        app.set_resources(vec![
            resource("r-1", "Dana", Some(dec!(175))),
            resource("r-2", "Marcus", Some(dec!(100))),
            resource("r-3", "Sam", None),
        ]);
        app.underwater_only = true;
        let visible = app.visible_resources();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "r-2");
    }

    #[test]
    fn leaving_dashboard_invalidates_pending_load() {
        let mut app = app();
        let generation = app.dashboard.begin_load();
        app.navigate_to(View::Contracts);
        assert!(!app.dashboard.accept(generation));
    }
}
