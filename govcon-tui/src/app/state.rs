use govcon::domain::{CompleteDashboard, ContractId, FinancialProjections, ResourceId};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Contracts,
    ContractDetail,
    Resources,
    Lcats,
    ApiLog,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Contracts => "Contracts",
            View::ContractDetail => "Contract",
            View::Resources => "Resources",
            View::Lcats => "LCATs",
            View::ApiLog => "API Log",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Overview,
    Contracts,
    Resources,
    Projections,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Overview,
        DashboardTab::Contracts,
        DashboardTab::Resources,
        DashboardTab::Projections,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Overview => "Overview",
            DashboardTab::Contracts => "Contracts",
            DashboardTab::Resources => "Resources",
            DashboardTab::Projections => "Projections",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Dashboard data plus the bookkeeping that keeps background loads from
/// landing on a view that has moved on.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub data: Option<CompleteDashboard>,
    pub projections: Option<FinancialProjections>,
    pub tab: DashboardTab,
    pub auto_refresh: bool,
    pub error: Option<String>,
    pub last_loaded: Option<Instant>,
    /// When the latest load was started, manual or automatic.
    last_requested: Option<Instant>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl DashboardState {
    pub fn new(auto_refresh: bool) -> Self {
        Self {
            auto_refresh,
            ..Default::default()
        }
    }

    /// Start a new load generation, cancelling any load still running.
    pub fn begin_load(&mut self) -> u64 {
        self.cancel();
        self.last_requested = Some(Instant::now());
        self.generation += 1;
        self.generation
    }

    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.in_flight = Some(handle);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// True when `generation` is still the latest load. Finishes it if so.
    pub fn accept(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Abort the running load and invalidate any result already queued.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Auto-refresh decision for one event-loop tick. A tick that comes due
    /// while a load is running is skipped and restarts the interval.
    pub fn poll_refresh(&mut self, view: View, interval: Duration, now: Instant) -> RefreshPoll {
        if view != View::Dashboard || !self.auto_refresh {
            return RefreshPoll::Idle;
        }
        let due = self
            .last_requested
            .map_or(true, |at| now.saturating_duration_since(at) >= interval);
        if !due {
            return RefreshPoll::Idle;
        }
        if self.is_loading() {
            self.last_requested = Some(now);
            return RefreshPoll::Skipped;
        }
        RefreshPoll::Load
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPoll {
    Idle,
    Load,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    ActivateContract(ContractId),
    CloseContract(ContractId),
    DeleteContract(ContractId),
    DiscardPendingEdits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmState {
    pub action: ConfirmAction,
    pub title: String,
    pub detail: String,
}

/// Rate changes staged on the resources and LCAT views, saved as one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRate {
    pub label: String,
    pub hourly_rate: Option<rust_decimal::Decimal>,
    pub published_rate: Option<rust_decimal::Decimal>,
    pub default_bill_rate: Option<rust_decimal::Decimal>,
}

/// Flattened cost-analysis payload for the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct CostAnalysis {
    pub resource_id: ResourceId,
    pub title: String,
    pub lines: Vec<(String, String)>,
}

impl CostAnalysis {
    /// The payload is untyped; nested keys are joined with dots, arrays by index.
    pub fn from_json(resource_id: ResourceId, title: String, value: &Value) -> Self {
        let mut lines = Vec::new();
        flatten_json("", value, &mut lines);
        Self {
            resource_id,
            title,
            lines,
        }
    }
}

fn flatten_json(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let key = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{}.{}", prefix, k)
        }
    };
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_json(&key(k), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_json(&key(&i.to_string()), v, out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Null => out.push((prefix.to_string(), "—".to_string())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

/// A single-line text input with a byte cursor kept on char boundaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() else {
            return;
        };
        self.value.drain(idx..self.cursor);
        self.cursor = idx;
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// (before, after) the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.cursor)
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}
