use crate::app::{App, ConfirmAction, FormState};
use crossterm::event::{KeyCode, KeyEvent};
use time::OffsetDateTime;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_resources_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let selected = app.selected_resource().cloned();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::LoadResources);
        }
        // Type and status filters are applied by the server.
        KeyCode::Char('f') => {
            app.cycle_resource_type();
            enqueue_action(action_tx, Action::LoadResources);
        }
        KeyCode::Char('v') => {
            app.cycle_active_filter();
            enqueue_action(action_tx, Action::LoadResources);
        }
        KeyCode::Char('w') => {
            app.underwater_only = !app.underwater_only;
            app.resource_index = 0;
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            enqueue_action(action_tx, Action::OpenNewResourceForm);
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(resource) = selected {
                enqueue_action(action_tx, Action::OpenEditResourceForm(resource.id));
            }
        }
        KeyCode::Char('t') => {
            if let Some(resource) = selected {
                app.open_form(FormState::terminate_resource(
                    &resource,
                    OffsetDateTime::now_utc(),
                ));
            }
        }
        KeyCode::Char('p') => {
            if let Some(resource) = selected {
                let pending = app
                    .pending_resource_rates
                    .get(&resource.id)
                    .and_then(|p| p.hourly_rate);
                app.open_form(FormState::stage_resource_rate(&resource, pending));
            }
        }
        KeyCode::Char('c') => {
            if let Some(resource) = selected {
                enqueue_action(action_tx, Action::LoadCostAnalysis(resource.id));
            }
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            enqueue_action(action_tx, Action::SaveResourceBatch);
        }
        KeyCode::Char('u') => {
            if app.has_pending_edits() {
                let count = app.pending_resource_rates.len() + app.pending_lcat_rates.len();
                app.open_confirm(
                    ConfirmAction::DiscardPendingEdits,
                    "Discard pending edits?",
                    format!("{} staged rate change(s) will be lost.", count),
                );
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app, resource};
    use crate::app::{FormKind, View};
    use crossterm::event::KeyModifiers;
    use rust_decimal_macros::dec;

    use super::super::super::action_queue::channel;

    fn resources_app() -> App {
        let mut app = app();
        app.navigate_to(View::Resources);
        app.set_resources(vec![
            resource("r-1", "Dana", Some(dec!(175))),
            resource("r-2", "Marcus", Some(dec!(100))),
        ]);
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_resources_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn server_filters_trigger_a_reload() {
        let mut app = resources_app();
        assert!(matches!(
            press(&mut app, KeyCode::Char('f')),
            Some(Action::LoadResources)
        ));
        assert!(app.resource_filters.resource_type.is_some());
    }

    #[test]
    fn underwater_toggle_is_local() {
        let mut app = resources_app();
        assert!(press(&mut app, KeyCode::Char('w')).is_none());
        assert_eq!(app.visible_resources().len(), 1);
    }

    #[test]
    fn p_stages_through_a_form() {
        let mut app = resources_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('p'));
        match app.form.as_ref().map(|f| &f.kind) {
            Some(FormKind::StageResourceRate(id)) => assert_eq!(id.as_str(), "r-2"),
            other => panic!("unexpected form: {other:?}"),
        }
    }

    #[test]
    fn discard_asks_only_when_something_is_staged() {
        let mut app = resources_app();
        press(&mut app, KeyCode::Char('u'));
        assert!(app.confirm.is_none());

        app.stage_resource_rate(govcon::domain::ResourceId::new("r-1"), dec!(70));
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(
            app.confirm.as_ref().map(|c| &c.action),
            Some(&ConfirmAction::DiscardPendingEdits)
        );
    }
}
