//! Response models returned by the inflation service

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Inflation rate for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationRateResponse {
    pub year: i32,
    pub rate: Decimal, // percent
}

/// Value change between two years
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueChangeResponse {
    pub start_year: i32,
    pub end_year: i32,
    pub value_change_factor: Decimal,
    pub description: String,
}

/// Value of a past amount in a later (or earlier) year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentValueResponse {
    pub original_year: i32,
    pub current_year: i32,
    pub original_amount: Decimal,
    pub current_value: Decimal,
    pub description: String,
}

/// Years covered by the loaded data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub min_year: i32,
    pub max_year: i32,
    pub years_available: usize,
}

impl ValueChangeResponse {
    pub fn new(start_year: i32, end_year: i32, value_change_factor: Decimal) -> Self {
        let description = format!(
            "$1.00 in {} is equivalent to ${} in {}",
            start_year,
            format_dollars(value_change_factor),
            end_year
        );
        Self {
            start_year,
            end_year,
            value_change_factor,
            description,
        }
    }
}

impl CurrentValueResponse {
    pub fn new(
        original_year: i32,
        current_year: i32,
        original_amount: Decimal,
        current_value: Decimal,
    ) -> Self {
        let description = format!(
            "${} in {} is worth ${} in {}",
            format_dollars(original_amount),
            original_year,
            format_dollars(current_value),
            current_year
        );
        Self {
            original_year,
            current_year,
            original_amount,
            current_value,
            description,
        }
    }
}

/// Render an amount with exactly two decimal places, rounding half away from zero
pub fn format_dollars(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
