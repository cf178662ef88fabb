//! Error types for inflation calculations

use rate_repository::RepositoryError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for calculation operations
pub type Result<T> = std::result::Result<T, CalculationError>;

/// Errors that can occur while computing inflation figures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// A requested year, or one inside a requested span, has no data
    #[error("No inflation data found for year {0}")]
    YearNotFound(i32),

    /// Amount is negative or not a finite number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// No series has been loaded yet
    #[error("No inflation data loaded")]
    EmptySeries,

    /// Compounding overflowed or divided by zero
    #[error("Cannot calculate value change from {start_year} to {end_year}: {reason}")]
    Arithmetic {
        start_year: i32,
        end_year: i32,
        reason: String,
    },

    /// Any other repository failure (source unavailable, bad configuration)
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl CalculationError {
    /// Create a new invalid-amount error for a decimal amount
    pub fn invalid_amount(amount: Decimal) -> Self {
        Self::InvalidAmount(amount.to_string())
    }

    /// Create a new arithmetic error
    pub fn arithmetic(start_year: i32, end_year: i32, reason: impl Into<String>) -> Self {
        Self::Arithmetic {
            start_year,
            end_year,
            reason: reason.into(),
        }
    }
}

impl From<RepositoryError> for CalculationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::YearNotFound(year) => CalculationError::YearNotFound(year),
            RepositoryError::EmptySeries => CalculationError::EmptySeries,
            other => CalculationError::Repository(other),
        }
    }
}
