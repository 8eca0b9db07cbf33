use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod api_log;
mod contract_detail;
mod contracts;
mod dashboard;
mod lcats;
mod overlays;
mod resources;

pub(super) use overlays::handle_overlay_key;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Switch to a top-level view and queue its initial load.
fn open_view(view: View, app: &mut App, action_tx: &ActionTx) {
    app.navigate_to(view);
    app.clear_status();
    let load = match view {
        View::Dashboard => Some(Action::LoadDashboard),
        View::Contracts => Some(Action::LoadContracts),
        View::Resources => Some(Action::LoadResources),
        View::Lcats => Some(Action::LoadLcats),
        View::ContractDetail | View::ApiLog => None,
    };
    if let Some(action) = load {
        enqueue_action(action_tx, action);
    }
}

/// Keys typed into the search box of the contracts and LCAT lists.
fn handle_search_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.search_input_clear();
            app.search_active = false;
        }
        KeyCode::Enter => app.search_active = false,
        KeyCode::Backspace => app.search_input_backspace(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input_clear();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input_char(c);
        }
        _ => {}
    }
}

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.search_active {
        handle_search_key(key, app);
        return;
    }

    let target = match key.code {
        KeyCode::Char('1') => Some(View::Dashboard),
        KeyCode::Char('2') => Some(View::Contracts),
        KeyCode::Char('3') => Some(View::Resources),
        KeyCode::Char('4') => Some(View::Lcats),
        KeyCode::Char('5') => Some(View::ApiLog),
        _ => None,
    };
    if let Some(view) = target {
        if view != app.current_view {
            open_view(view, app, action_tx);
        }
        return;
    }
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
        app.quit();
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.current_view {
        View::Dashboard => dashboard::handle_dashboard_key(key, app, action_tx),
        View::Contracts => contracts::handle_contracts_key(key, app, action_tx),
        View::ContractDetail => contract_detail::handle_contract_detail_key(key, app, action_tx),
        View::Resources => resources::handle_resources_key(key, app, action_tx),
        View::Lcats => lcats::handle_lcats_key(key, app, action_tx),
        View::ApiLog => api_log::handle_api_log_key(key, app, action_tx),
    }
}
