use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

/// Route a key to the topmost overlay: confirm, then form, then cost analysis.
pub(in crate::runtime) fn handle_overlay_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.confirm.is_some() {
        handle_confirm_key(key, app, action_tx);
    } else if app.form.is_some() {
        handle_form_key(key, app, action_tx);
    } else if app.cost_analysis.is_some() {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('c')
        ) {
            app.cost_analysis = None;
        }
    }
}

fn handle_confirm_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            enqueue_action(action_tx, Action::ConfirmPending);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm = None;
        }
        _ => {}
    }
}

fn handle_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Enter {
        if app.submitting {
            app.set_status("Still saving, please wait");
        } else {
            enqueue_action(action_tx, Action::SubmitForm);
        }
        return;
    }
    if key.code == KeyCode::Esc {
        app.close_form();
        return;
    }
    let Some(form) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Left => form.move_horizontal(false),
        KeyCode::Right => form.move_horizontal(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;
    use crate::app::{ConfirmAction, FormState};

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_overlay_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn confirm_takes_precedence_over_form() {
        let mut app = app();
        app.open_form(FormState::new_lcat());
        app.open_confirm(
            ConfirmAction::DiscardPendingEdits,
            "Discard pending edits?",
            String::new(),
        );
        assert!(matches!(
            press(&mut app, KeyCode::Char('y')),
            Some(Action::ConfirmPending)
        ));
        assert!(press(&mut app, KeyCode::Char('n')).is_none());
        assert!(app.confirm.is_none());
        assert!(app.form.is_some());
    }

    #[test]
    fn form_typing_and_submit() {
        let mut app = app();
        app.open_form(FormState::new_lcat());
        press(&mut app, KeyCode::Char('Q'));
        press(&mut app, KeyCode::Char('A'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.as_ref().unwrap().fields[0].input.value, "Q");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.as_ref().unwrap().focused, 1);

        assert!(matches!(
            press(&mut app, KeyCode::Enter),
            Some(Action::SubmitForm)
        ));
    }

    #[test]
    fn enter_is_refused_while_submitting() {
        let mut app = app();
        app.open_form(FormState::new_lcat());
        app.submitting = true;
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert!(app.form.is_some());
    }

    #[test]
    fn esc_closes_the_form() {
        let mut app = app();
        app.open_form(FormState::new_lcat());
        press(&mut app, KeyCode::Esc);
        assert!(app.form.is_none());
    }
}
