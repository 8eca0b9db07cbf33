use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "govcon-tui";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovconConfig {
    /// Base URL of the contract finance API, e.g. "http://localhost:5154"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Poll the dashboard in the background when it is open.
    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_projection_months")]
    pub projection_months: u32,
    /// `tracing` filter directive, overridden by `GOVCON_LOG`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_url() -> String {
    govcon::DEFAULT_API_URL.to_string()
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_projection_months() -> u32 {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GovconConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auto_refresh: false,
            refresh_interval_secs: default_refresh_interval_secs(),
            projection_months: default_projection_months(),
            log_level: default_log_level(),
        }
    }
}

impl GovconConfig {
    fn app_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join(APP_DIR))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::app_dir()?.join("govcon-tui.log"))
    }

    /// Load config from disk. Returns default config if file doesn't exist.
    /// `GOVCON_API_URL` takes precedence over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::parse(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env_override(std::env::var(govcon::API_URL_ENV).ok());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_override(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}
