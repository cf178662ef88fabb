//! Configuration for the rate repository

use crate::error::{RepositoryError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the bundled rate table
pub const DEFAULT_DATA_PATH: &str = "data/inflation_data.csv";

/// Default number of skipped rows kept in a load report
pub const DEFAULT_MAX_REPORTED_SKIPS: usize = 100;

/// Configuration for the rate repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Path of the CSV file holding the year/rate table
    pub data_path: PathBuf,

    /// Maximum number of skipped rows kept verbatim in the load report
    pub max_reported_skips: usize,

    /// Header names of the year and rate columns
    pub columns: ColumnMapping,

    /// Optional plausibility bounds for rates, in percent
    pub rate_bounds: Option<RateBounds>,
}

/// Header names used to locate the year and rate columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Year column name (matched case-insensitively)
    pub year: String,

    /// Rate column name (matched case-insensitively)
    pub rate: String,
}

/// Inclusive bounds a rate must fall within to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            max_reported_skips: DEFAULT_MAX_REPORTED_SKIPS,
            columns: ColumnMapping::default(),
            rate_bounds: None,
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            year: "year".to_string(),
            rate: "rate".to_string(),
        }
    }
}

impl RateBounds {
    /// Check whether a rate lies within the bounds
    pub fn contains(&self, rate: Decimal) -> bool {
        rate >= self.min && rate <= self.max
    }
}

impl RepositoryConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.columns.year.trim().is_empty() || self.columns.rate.trim().is_empty() {
            return Err(RepositoryError::config("column names must not be empty"));
        }

        if self.columns.year.trim().eq_ignore_ascii_case(self.columns.rate.trim()) {
            return Err(RepositoryError::config(format!(
                "year and rate columns must differ (both '{}')",
                self.columns.year
            )));
        }

        if let Some(bounds) = self.rate_bounds {
            if bounds.min > bounds.max {
                return Err(RepositoryError::config(format!(
                    "rate bounds are inverted: min {} > max {}",
                    bounds.min, bounds.max
                )));
            }
        }

        Ok(())
    }
}
