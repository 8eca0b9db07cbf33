//! One-shot subcommands that talk to the API without starting the TUI.

use anyhow::{Context, Result};
use govcon::domain::{
    format_percentage, Contract, ContractStatus, FundingWarningLevel, ResourceFilters,
};
use govcon::ContractFinanceApi;
use std::path::Path;
use time::OffsetDateTime;

/// Probe the two listings the TUI needs first and report what came back.
pub async fn check(api: &dyn ContractFinanceApi, api_url: &str) -> Result<()> {
    println!("Checking {}", api_url);
    let mut failed = false;

    match api.list_lcats().await {
        Ok(lcats) => println!("  LCATs:     {} found", lcats.len()),
        Err(e) => {
            failed = true;
            println!("  LCATs:     {}", e.user_message("Failed to load LCATs"));
            if let Some(hint) = e.hint() {
                println!("             {}", hint);
            }
        }
    }

    match api.list_resources(&ResourceFilters::default()).await {
        Ok(resources) => println!("  Resources: {} found", resources.len()),
        Err(e) => {
            failed = true;
            println!("  Resources: {}", e.user_message("Failed to load resources"));
            if let Some(hint) = e.hint() {
                println!("             {}", hint);
            }
        }
    }

    if failed {
        anyhow::bail!("API check failed");
    }
    println!("API is reachable");
    Ok(())
}

pub async fn export(
    api: &dyn ContractFinanceApi,
    filters: &ResourceFilters,
    out: &Path,
) -> Result<()> {
    let bytes = api
        .export_resources(filters)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to export resources")))?;
    std::fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), bytes = bytes.len(), "resource export written");
    println!("Wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

/// Active and draft contracts paired with their warning level, most severe first.
pub async fn contract_warnings(
    api: &dyn ContractFinanceApi,
    now: OffsetDateTime,
) -> Result<Vec<(FundingWarningLevel, Contract)>> {
    let contracts = api
        .list_contracts()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load contracts")))?;
    let mut rows: Vec<_> = contracts
        .into_iter()
        .filter(|c| c.status != ContractStatus::Closed)
        .map(|c| (c.funding_warning(now), c))
        .collect();
    rows.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.contract_number.cmp(&b.1.contract_number))
    });
    Ok(rows)
}

pub async fn warnings(api: &dyn ContractFinanceApi, now: OffsetDateTime) -> Result<()> {
    let rows = contract_warnings(api, now).await?;
    if rows.is_empty() {
        println!("No open contracts");
        return Ok(());
    }
    for (level, contract) in rows {
        println!(
            "{} {:<9} {:<20} {:>7} funded  {:>5} days  {}",
            level.marker(),
            level.label(),
            contract.contract_number,
            format_percentage(contract.percent_funded()),
            contract.days_remaining(now),
            contract.contract_name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DevBackend;
    use time::macros::datetime;

    fn backend() -> DevBackend {
        DevBackend::at(datetime!(2025-06-01 12:00:00 UTC))
    }

    #[tokio::test]
    async fn warnings_skip_closed_and_sort_by_severity() {
        let api = backend();
        let rows = contract_warnings(&api, datetime!(2025-06-01 12:00:00 UTC))
            .await
            .unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|(_, c)| c.status != ContractStatus::Closed));
        assert!(rows.windows(2).all(|w| w[0].0 >= w[1].0));
    }

    #[tokio::test]
    async fn check_succeeds_against_dev_backend() {
        let api = backend();
        check(&api, "dev").await.unwrap();
    }

    #[tokio::test]
    async fn export_writes_bytes_to_file() {
        let api = backend();
        let dir = std::env::temp_dir().join(format!("govcon-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let out = dir.join("resources.csv");
        export(&api, &ResourceFilters::default(), &out).await.unwrap();
        let written = std::fs::read(&out).unwrap();
        assert!(!written.is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
