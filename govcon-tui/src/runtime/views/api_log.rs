use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::ActionTx;
use super::open_view;

pub(super) fn handle_api_log_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') => {
            app.api_log.clear();
            app.set_status("API log cleared");
        }
        KeyCode::Esc => open_view(View::Dashboard, app, action_tx),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::app;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    use super::super::super::action_queue::channel;

    #[test]
    fn c_clears_the_shared_log() {
        let mut app = app();
        let shared = app.api_log.clone();
        shared.response("GET", "http://localhost:5154/api/LCAT", 200, Duration::from_millis(12));
        let (tx, _rx) = channel();
        handle_api_log_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE), &mut app, &tx);
        assert!(shared.is_empty());
    }
}
