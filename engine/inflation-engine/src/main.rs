//! # Inflation Report Binary
//!
//! Loads the configured rate series and answers a single query.

use anyhow::{Context, Result};
use clap::Parser;
use inflation_engine::cli::{Cli, CliHandler};
use inflation_engine::{initialize_logging, load_config, InflationService};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Starting inflation-report v{}", inflation_engine::VERSION);

    let service =
        InflationService::from_config(&config).context("Failed to load rate data")?;
    CliHandler::new(service).handle_command(cli.command)?;

    Ok(())
}
