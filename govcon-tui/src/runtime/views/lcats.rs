use crate::app::{App, ConfirmAction, FormState};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_lcats_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Esc if !app.search_input.value.is_empty() => app.search_input_clear(),
        KeyCode::Char('r') | KeyCode::Char('R') => enqueue_action(action_tx, Action::LoadLcats),
        KeyCode::Char('n') | KeyCode::Char('N') => app.open_form(FormState::new_lcat()),
        KeyCode::Char('p') | KeyCode::Enter => {
            if let Some(lcat) = app.selected_lcat() {
                let form = FormState::stage_lcat_rates(lcat);
                app.open_form(form);
            }
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            enqueue_action(action_tx, Action::SaveRateBatch);
        }
        KeyCode::Char('u') => {
            if !app.pending_lcat_rates.is_empty() {
                app.open_confirm(
                    ConfirmAction::DiscardPendingEdits,
                    "Discard pending edits?",
                    format!(
                        "{} staged rate change(s) will be lost.",
                        app.pending_lcat_rates.len() + app.pending_resource_rates.len()
                    ),
                );
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;
    use crossterm::event::KeyModifiers;

    use super::super::super::action_queue::channel;

    #[test]
    fn s_queues_the_rate_batch() {
        let mut app = app();
        let (tx, mut rx) = channel();
        handle_lcats_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE), &mut app, &tx);
        assert!(matches!(rx.try_recv().ok(), Some(Action::SaveRateBatch)));
    }

    #[test]
    fn slash_enters_search() {
        let mut app = app();
        let (tx, _rx) = channel();
        handle_lcats_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE), &mut app, &tx);
        assert!(app.search_active);
    }
}
