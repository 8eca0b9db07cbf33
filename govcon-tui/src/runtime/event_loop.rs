use crate::api::SharedApi;
use crate::app::{App, RefreshPoll};
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::{handle_overlay_key, handle_view_key};

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: SharedApi,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let _ = action_tx.send(Action::LoadDashboard);

    loop {
        app.is_loading = app.dashboard.is_loading() || app.submitting;
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_loading {
            app.throbber_state.calc_next();
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.has_overlay() {
                        handle_overlay_key(key, app, &action_tx);
                    } else {
                        handle_view_key(key, app, &action_tx);
                    }
                }
            }
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, &api, &action_tx).await;
        }

        match app
            .dashboard
            .poll_refresh(app.current_view, app.refresh_interval, Instant::now())
        {
            RefreshPoll::Load => {
                let _ = action_tx.send(Action::LoadDashboard);
            }
            RefreshPoll::Skipped => {
                tracing::debug!("Skipping auto-refresh, a load is still running");
            }
            RefreshPoll::Idle => {}
        }

        if !app.running {
            break;
        }
    }

    app.dashboard.cancel();
    Ok(())
}
