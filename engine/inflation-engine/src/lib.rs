//! Inflation Engine - purchasing-power calculations over yearly inflation rates
//!
//! The engine compounds per-year rates from a [`RateRepository`] to convert
//! dollar amounts between years. All arithmetic is exact decimal; rounding
//! only happens when the service renders human-readable descriptions.

pub mod calculator;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;


pub use calculator::{parse_amount, value_change_factor, value_in_year, InflationCalculator};
pub use config::{load_config, LoggingConfig, ServiceConfig};
pub use error::{CalculationError, Result};
pub use logging::initialize_logging;
pub use models::{
    CoverageResponse, CurrentValueResponse, InflationRateResponse, ValueChangeResponse,
};
pub use service::InflationService;

/// Re-export commonly used repository types
pub use rate_repository::{LoadReport, RateRepository, RateSeries, RateSource, RepositoryConfig};

/// Current version of the inflation engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
