//! Grid
//!
//! Unified HTTP front end for serverless backends.
//!
//! Usage:
//! ```bash
//! # Default: local no-op backend on 127.0.0.1:1111
//! cargo run --package grid
//!
//! # In-memory backend on an ephemeral port with request logging
//! GRID_ADAPTER=memory cargo run --package grid -- --address 127.0.0.1:0 --verbose
//!
//! # Print the version
//! cargo run --package grid -- version
//! ```

mod cli;
mod signal;
mod version;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use grid_adapter::{Adapter, create_adapter};
use grid_http_server::CancellationToken;

use crate::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        args.log_config();
    }

    if args.print_version() {
        println!("{}", version::version());
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise info, or debug when verbose.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

async fn run(args: Args) -> Result<()> {
    let version = version::version();
    info!("Starting grid {}", version);

    let adapter = create_adapter(args.adapter);
    match adapter.instances().await {
        Ok(count) => info!("Adapter {} manages {} instances", adapter.name(), count),
        Err(err) => warn!("Adapter {} cannot report instances: {}", adapter.name(), err),
    }

    let server = args.server_builder(version, adapter).build();

    let cancel = CancellationToken::new();
    tokio::spawn(signal::cancel_on_shutdown_signal(cancel.clone()));

    server.serve(cancel).await?;
    Ok(())
}
