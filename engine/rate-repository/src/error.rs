//! Error types for the rate repository

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors that can occur while loading or querying a rate series
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Backing source missing, unreadable, malformed at the header level,
    /// or without a single valid row
    #[error("Rate source '{source_name}' unavailable: {reason}")]
    SourceUnavailable {
        source_name: String,
        reason: String,
    },

    /// Year is not a key of the loaded series
    #[error("No inflation data found for year {0}")]
    YearNotFound(i32),

    /// Year lies outside the 1800-2100 plausibility bound
    #[error("Year {0} is outside the plausible range")]
    YearOutOfRange(i32),

    /// Nothing has been loaded successfully yet
    #[error("No inflation data loaded")]
    EmptySeries,

    /// Invalid repository configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RepositoryError {
    /// Create a new source-unavailable error
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Why a single row of the source was skipped.
///
/// Row errors never abort a load; they are collected into the
/// [`LoadReport`](crate::types::LoadReport).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowError {
    #[error("row is missing the year or rate field")]
    MissingField,

    #[error("year '{0}' is not an integer")]
    InvalidYear(String),

    #[error("year {0} is outside the plausible range")]
    YearOutOfRange(i32),

    #[error("rate '{0}' is not a decimal number")]
    InvalidRate(String),

    #[error("rate {0} is outside the configured bounds")]
    RateOutOfBounds(Decimal),

    #[error("unreadable record: {0}")]
    Unreadable(String),
}
