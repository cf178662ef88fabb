//! Rate Repository - loads yearly inflation rates
//!
//! This crate turns a two-column `year,rate` table into a validated,
//! immutable [`RateSeries`]. Malformed rows are skipped and described in a
//! [`LoadReport`] rather than failing the load, and reloads publish a fully
//! built series in a single pointer swap.

pub mod config;
pub mod error;
pub mod loader;
pub mod repository;
pub mod types;

pub use config::{
    ColumnMapping, RateBounds, RepositoryConfig, DEFAULT_DATA_PATH, DEFAULT_MAX_REPORTED_SKIPS,
};
pub use error::{RepositoryError, Result, RowError};
pub use loader::{parse_rate, parse_year};
pub use repository::RateRepository;
pub use types::{
    is_plausible_year, LoadOutcome, LoadReport, RateRecord, RateSeries, RateSource, SkippedRow,
    MAX_PLAUSIBLE_YEAR, MIN_PLAUSIBLE_YEAR,
};
