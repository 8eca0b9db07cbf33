use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use govcon::domain::{ContractId, LcatId, ResourceFilters, ResourceType};

#[derive(Debug, Parser)]
#[command(name = "govcon-tui")]
#[command(about = "Terminal dashboard for federal contract finances")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the contract finance API (default)
    Run,
    /// Run with local in-memory data
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
    /// Probe the API: list LCATs and resources and report counts
    Check,
    /// Download the resource spreadsheet export
    Export {
        /// Where to write the spreadsheet
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        search: Option<String>,
        #[arg(long = "type", value_enum)]
        resource_type: Option<ResourceTypeArg>,
        #[arg(long)]
        lcat: Option<String>,
        #[arg(long)]
        contract: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Print contracts with their funding warning level, most severe first
    Warnings,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResourceTypeArg {
    W2,
    Sub,
    #[value(name = "1099")]
    Contractor1099,
    Fp,
}

impl From<ResourceTypeArg> for ResourceType {
    fn from(arg: ResourceTypeArg) -> Self {
        match arg {
            ResourceTypeArg::W2 => ResourceType::W2Internal,
            ResourceTypeArg::Sub => ResourceType::Subcontractor,
            ResourceTypeArg::Contractor1099 => ResourceType::Contractor1099,
            ResourceTypeArg::Fp => ResourceType::FixedPrice,
        }
    }
}

pub fn export_filters(
    search: Option<String>,
    resource_type: Option<ResourceTypeArg>,
    lcat: Option<String>,
    contract: Option<String>,
    active: Option<bool>,
) -> ResourceFilters {
    ResourceFilters {
        search_term: search,
        resource_type: resource_type.map(ResourceType::from),
        lcat_id: lcat.map(LcatId::from),
        contract_id: contract.map(ContractId::from),
        is_active: active,
    }
}
