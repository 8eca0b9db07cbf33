use crate::app::{App, ConfirmAction, FormState, View};
use crossterm::event::{KeyCode, KeyEvent};
use govcon::domain::{format_currency, ContractStatus};

use super::super::action_queue::{Action, ActionTx};
use super::{enqueue_action, open_view};

pub(super) fn handle_contract_detail_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(detail) = app.detail.as_ref() else {
        open_view(View::Contracts, app, action_tx);
        return;
    };
    let contract = detail.contract.clone();
    let assignment = detail.selected_assignment().cloned();

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Esc | KeyCode::Backspace => open_view(View::Contracts, app, action_tx),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::ReloadContractDetail);
        }
        KeyCode::Char('f') | KeyCode::Char('F') => {
            app.open_form(FormState::update_funding(&contract));
        }
        KeyCode::Char('a') => {
            if contract.status.can_activate() {
                app.open_confirm(
                    ConfirmAction::ActivateContract(contract.id.clone()),
                    "Activate contract?",
                    format!("{} will start burning funds.", contract.contract_number),
                );
            } else {
                app.set_status("Only draft contracts can be activated");
            }
        }
        KeyCode::Char('c') => {
            if contract.status.can_close() {
                app.open_confirm(
                    ConfirmAction::CloseContract(contract.id.clone()),
                    "Close contract?",
                    format!(
                        "{} has {} funded.",
                        contract.contract_number,
                        format_currency(contract.funded_value)
                    ),
                );
            } else {
                app.set_status("Only active contracts can be closed");
            }
        }
        KeyCode::Char('D') => {
            if contract.status == ContractStatus::Active {
                app.set_status("Active contracts must be closed before deletion");
            } else {
                app.open_confirm(
                    ConfirmAction::DeleteContract(contract.id.clone()),
                    "Delete contract?",
                    format!("{} · {}", contract.contract_number, contract.contract_name),
                );
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            enqueue_action(action_tx, Action::OpenAssignForm(contract.id.clone()));
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(row) = assignment {
                app.open_form(FormState::edit_assignment(&row));
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(row) = assignment {
                app.open_form(FormState::remove_assignment(&row));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app, contract};
    use crate::app::{ContractDetail, FormKind};
    use crossterm::event::KeyModifiers;

    use super::super::super::action_queue::channel;

    fn detail_app(status: ContractStatus) -> App {
        let mut app = app();
        let mut c = contract("c-1", "W91-0012", "Logistics");
        c.status = status;
        app.detail = Some(ContractDetail {
            contract: c,
            assignments: vec![],
            burn: None,
            selected: 0,
        });
        app.navigate_to(View::ContractDetail);
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_contract_detail_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn activate_needs_a_draft() {
        let mut app = detail_app(ContractStatus::Active);
        press(&mut app, KeyCode::Char('a'));
        assert!(app.confirm.is_none());
        assert_eq!(
            app.status_message.as_deref(),
            Some("Only draft contracts can be activated")
        );

        let mut app = detail_app(ContractStatus::Draft);
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(
            app.confirm.as_ref().map(|c| &c.action),
            Some(ConfirmAction::ActivateContract(_))
        ));
    }

    #[test]
    fn active_contracts_cannot_be_deleted() {
        let mut app = detail_app(ContractStatus::Active);
        press(&mut app, KeyCode::Char('D'));
        assert!(app.confirm.is_none());

        let mut app = detail_app(ContractStatus::Closed);
        press(&mut app, KeyCode::Char('D'));
        assert!(app.confirm.is_some());
    }

    #[test]
    fn n_queues_the_assign_form_and_esc_returns_to_list() {
        let mut app = detail_app(ContractStatus::Active);
        match press(&mut app, KeyCode::Char('n')) {
            Some(Action::OpenAssignForm(id)) => assert_eq!(id.as_str(), "c-1"),
            other => panic!("unexpected action: {other:?}"),
        }
        press(&mut app, KeyCode::Char('f'));
        assert!(matches!(
            app.form.as_ref().map(|f| &f.kind),
            Some(FormKind::UpdateFunding(_))
        ));

        assert!(matches!(
            press(&mut app, KeyCode::Esc),
            Some(Action::LoadContracts)
        ));
        assert_eq!(app.current_view, View::Contracts);
    }
}
