//! Command-line and environment configuration

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use tracing::info;

use grid_adapter::AdapterKind;
use grid_http_server::{DEFAULT_ADDRESS, GridServer, GridServerBuilder, SharedAdapter};

const ABOUT: &str = "Provide a unified, local interface to underlying serverless \
infrastructure in a manner befitting a utility grid.";

/// Command-line arguments for the grid service.
///
/// Every flag falls back to its `GRID_*` environment variable when absent.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "grid", about = ABOUT, disable_version_flag = true)]
pub struct Args {
    /// Print version
    #[arg(long, env = "GRID_VERSION", value_parser = BoolishValueParser::new())]
    pub version: bool,

    /// Print verbose logs
    #[arg(long, env = "GRID_VERBOSE", value_parser = BoolishValueParser::new())]
    pub verbose: bool,

    /// Listen address
    #[arg(long, env = "GRID_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Underlying architecture (local|memory|knative|platformb|platformc)
    #[arg(long, env = "GRID_ADAPTER", default_value = "local")]
    pub adapter: AdapterKind,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print version and exit
    Version,
}

impl Args {
    /// Whether the version should be printed instead of serving
    pub fn print_version(&self) -> bool {
        self.version || self.command == Some(Command::Version)
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        info!("GRID_VERSION={}", self.version);
        info!("GRID_VERBOSE={}", self.verbose);
        info!("GRID_ADDRESS={}", self.address);
        info!("GRID_ADAPTER={}", self.adapter);
    }

    /// Server builder carrying this configuration
    pub fn server_builder(&self, version: String, adapter: SharedAdapter) -> GridServerBuilder {
        GridServer::builder()
            .address(self.address.clone())
            .verbose(self.verbose)
            .version(version)
            .adapter(adapter)
    }
}
