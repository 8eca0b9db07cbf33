use crate::app::{App, FormState};
use crossterm::event::{KeyCode, KeyEvent};
use time::OffsetDateTime;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_contracts_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Esc if !app.search_input.value.is_empty() => app.search_input_clear(),
        KeyCode::Enter => {
            if let Some(contract) = app.selected_contract() {
                let id = contract.id.clone();
                enqueue_action(action_tx, Action::OpenContract(id));
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.open_form(FormState::new_contract(OffsetDateTime::now_utc()));
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::LoadContracts);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app, contract};
    use crate::app::{FormKind, View};
    use crossterm::event::KeyModifiers;

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_contracts_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn enter_opens_the_selected_contract() {
        let mut app = app();
        app.navigate_to(View::Contracts);
        app.set_contracts(vec![contract("c-1", "A-1", "Alpha"), contract("c-2", "B-2", "Beta")]);
        press(&mut app, KeyCode::Down);
        match press(&mut app, KeyCode::Enter) {
            Some(Action::OpenContract(id)) => assert_eq!(id.as_str(), "c-2"),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn enter_on_empty_list_does_nothing() {
        let mut app = app();
        app.navigate_to(View::Contracts);
        assert!(press(&mut app, KeyCode::Enter).is_none());
    }

    #[test]
    fn n_opens_a_draft_contract_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.form.as_ref().map(|f| &f.kind), Some(&FormKind::NewContract));
    }
}
