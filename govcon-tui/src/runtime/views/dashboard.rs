use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_dashboard_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_dashboard_tab(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_dashboard_tab(),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::LoadDashboard);
        }
        KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_auto_refresh(),
        _ => {}
    }
}
