use anyhow::{Context, Result};
use govcon::{ApiUrl, ContractFinanceApi, GovconClient};
use std::sync::Arc;

mod dev_backend;
mod dev_dashboard;
mod dev_seed;

pub use dev_backend::DevBackend;

/// The backend every view talks to, real or in-memory.
pub type SharedApi = Arc<dyn ContractFinanceApi>;

pub fn connect(api_url: &str) -> Result<SharedApi> {
    let client = GovconClient::new(ApiUrl::new(api_url))
        .with_context(|| format!("Invalid API URL: {}", api_url))?;
    Ok(Arc::new(client))
}

pub fn dev() -> SharedApi {
    Arc::new(DevBackend::new())
}
