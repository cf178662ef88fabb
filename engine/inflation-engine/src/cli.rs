//! # Command Line Interface
//!
//! Query tool over the loaded inflation series. Responses are printed as JSON.

use crate::calculator::parse_amount;
use crate::service::InflationService;
use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

/// Inflation report CLI
#[derive(Parser)]
#[command(name = "inflation-report")]
#[command(about = "Query inflation rates and purchasing-power conversions")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the range of years with data
    Coverage,
    /// Show the inflation rate for one year
    Rate {
        year: i32,
    },
    /// Show the value-change factor between two years
    Factor {
        start_year: i32,
        end_year: i32,
    },
    /// Convert an amount from one year into another
    Value {
        /// Year the amount is expressed in
        year: i32,
        /// Dollar amount to convert
        #[arg(long, default_value = "1", value_parser = parse_amount_arg)]
        amount: Decimal,
        /// Year to convert into (defaults to the latest year with data)
        #[arg(long)]
        target_year: Option<i32>,
    },
    /// Show the report of the most recent load
    Report,
}

fn parse_amount_arg(text: &str) -> std::result::Result<Decimal, String> {
    parse_amount(text).map_err(|e| e.to_string())
}

/// CLI handler
pub struct CliHandler {
    service: InflationService,
}

impl CliHandler {
    pub fn new(service: InflationService) -> Self {
        Self { service }
    }

    /// Handle CLI commands
    pub fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Coverage => print_json(&self.service.get_coverage()?),
            Commands::Rate { year } => print_json(&self.service.get_rate(year)?),
            Commands::Factor {
                start_year,
                end_year,
            } => print_json(&self.service.get_value_change_factor(start_year, end_year)?),
            Commands::Value {
                year,
                amount,
                target_year,
            } => match target_year {
                Some(target) => {
                    print_json(&self.service.get_current_value_in(year, target, amount)?)
                }
                None => print_json(&self.service.get_current_value(year, amount)?),
            },
            Commands::Report => match self.service.load_report() {
                Some(report) => print_json(&report),
                None => anyhow::bail!("No data has been loaded"),
            },
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
