use super::*;
use govcon::domain::ResourceType;

impl App {
    fn list_len(&self) -> usize {
        match self.current_view {
            View::Contracts => self.visible_contracts().len(),
            View::Resources => self.visible_resources().len(),
            View::Lcats => self.visible_lcats().len(),
            View::ContractDetail => self.detail.as_ref().map_or(0, |d| d.assignments.len()),
            View::Dashboard | View::ApiLog => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_view {
            View::Contracts => Some(&mut self.contract_index),
            View::Resources => Some(&mut self.resource_index),
            View::Lcats => Some(&mut self.lcat_index),
            View::ContractDetail => self.detail.as_mut().map(|d| &mut d.selected),
            View::Dashboard | View::ApiLog => None,
        }
    }

    /// Move down in the current list, stopping at the last row.
    pub fn select_next(&mut self) {
        let len = self.list_len();
        if let Some(idx) = self.selection_mut() {
            if *idx + 1 < len {
                *idx += 1;
            }
        }
    }

    pub fn select_previous(&mut self) {
        if let Some(idx) = self.selection_mut() {
            *idx = idx.saturating_sub(1);
        }
    }

    pub fn select_first(&mut self) {
        if let Some(idx) = self.selection_mut() {
            *idx = 0;
        }
    }

    pub fn select_last(&mut self) {
        let len = self.list_len();
        if let Some(idx) = self.selection_mut() {
            *idx = len.saturating_sub(1);
        }
    }

    pub(super) fn reset_selection(&mut self) {
        self.select_first();
    }

    pub fn next_dashboard_tab(&mut self) {
        self.dashboard.tab = self.dashboard.tab.next();
    }

    pub fn previous_dashboard_tab(&mut self) {
        self.dashboard.tab = self.dashboard.tab.previous();
    }

    pub fn toggle_auto_refresh(&mut self) {
        self.dashboard.auto_refresh = !self.dashboard.auto_refresh;
        let state = if self.dashboard.auto_refresh {
            format!("Auto-refresh every {}s", self.refresh_interval.as_secs())
        } else {
            "Auto-refresh off".to_string()
        };
        self.set_status(state);
    }

    pub fn cycle_resource_type(&mut self) {
        self.resource_filters.resource_type = match self.resource_filters.resource_type {
            None => Some(ResourceType::W2Internal),
            Some(ResourceType::FixedPrice) => None,
            Some(t) => Some(t.next()),
        };
        self.resource_index = 0;
    }

    /// All → active only → inactive only → all.
    pub fn cycle_active_filter(&mut self) {
        self.resource_filters.is_active = match self.resource_filters.is_active {
            None => Some(true),
            Some(true) => Some(false),
            Some(false) => None,
        };
        self.resource_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn selection_stops_at_list_edges() {
        let mut app = app();
        app.navigate_to(View::Contracts);
        app.set_contracts(vec![contract("c-1", "A", "a"), contract("c-2", "B", "b")]);
        app.select_previous();
        assert_eq!(app.contract_index, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.contract_index, 1);
        app.select_first();
        assert_eq!(app.contract_index, 0);
    }

    #[test]
    fn resource_type_filter_cycles_through_none() {
        let mut app = app();
        let mut seen = Vec::new();
        for _ in 0..5 {
            app.cycle_resource_type();
            seen.push(app.resource_filters.resource_type);
        }
        assert_eq!(
            seen,
            vec![
                Some(ResourceType::W2Internal),
                Some(ResourceType::Subcontractor),
                Some(ResourceType::Contractor1099),
                Some(ResourceType::FixedPrice),
                None,
            ]
        );
    }
}
