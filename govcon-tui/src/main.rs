mod api;
mod app;
mod cli;
mod commands;
mod config;
mod logging;
mod runtime;
mod ui;

use anyhow::Result;
use api::SharedApi;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::GovconConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = GovconConfig::load()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            logging::init_file(&cfg.log_level, &GovconConfig::log_path()?)?;
            let api = api::connect(&cfg.api_url)?;
            run_tui(&cfg, api, cfg.api_url.clone()).await
        }
        Commands::Dev => {
            logging::init_file(&cfg.log_level, &GovconConfig::log_path()?)?;
            run_tui(&cfg, api::dev(), "dev (in-memory)".to_string()).await
        }
        Commands::ConfigPath => {
            let path = GovconConfig::config_path()?;
            if !path.exists() {
                GovconConfig::default().save()?;
                println!("Created default config at {}", path.display());
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Check => {
            logging::init_stderr(&cfg.log_level);
            let api = api::connect(&cfg.api_url)?;
            commands::check(api.as_ref(), &cfg.api_url).await
        }
        Commands::Export {
            out,
            search,
            resource_type,
            lcat,
            contract,
            active,
        } => {
            logging::init_stderr(&cfg.log_level);
            let api = api::connect(&cfg.api_url)?;
            let filters = cli::export_filters(search, resource_type, lcat, contract, active);
            commands::export(api.as_ref(), &filters, &out).await
        }
        Commands::Warnings => {
            logging::init_stderr(&cfg.log_level);
            let api = api::connect(&cfg.api_url)?;
            commands::warnings(api.as_ref(), time::OffsetDateTime::now_utc()).await
        }
    }
}

async fn run_tui(cfg: &GovconConfig, api: SharedApi, label: String) -> Result<()> {
    tracing::info!(backend = %label, "starting govcon-tui");
    let mut app = App::new(cfg, label);
    app.api_log = api.api_log().clone();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, api).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "event loop failed");
    }
    res
}
