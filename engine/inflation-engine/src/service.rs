//! Inflation service - the entry points used by the HTTP and CLI layers
//!
//! Every year and amount range check visible to end users happens here or
//! in the calculator underneath; callers only need to supply well-typed
//! values.

use crate::calculator::{value_in_year, InflationCalculator};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::models::{
    CoverageResponse, CurrentValueResponse, InflationRateResponse, ValueChangeResponse,
};
use rate_repository::{LoadReport, RateRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

/// Inflation service wrapping a calculator and its repository
#[derive(Debug, Clone)]
pub struct InflationService {
    calculator: InflationCalculator,
}

impl InflationService {
    /// Create a new service over an already loaded repository
    pub fn new(repository: Arc<RateRepository>) -> Self {
        Self {
            calculator: InflationCalculator::new(repository),
        }
    }

    /// Build the repository from configuration, load it and wrap it
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let repository = RateRepository::open(config.repository.clone())?;
        Ok(Self::new(Arc::new(repository)))
    }

    pub fn calculator(&self) -> &InflationCalculator {
        &self.calculator
    }

    /// Get the inflation rate for a specific year
    pub fn get_rate(&self, year: i32) -> Result<InflationRateResponse> {
        let rate = self.calculator.rate_in_year(year)?;
        info!("Retrieved inflation rate for {}: {}%", year, rate);
        Ok(InflationRateResponse { year, rate })
    }

    /// Get the factor converting end-year dollars into start-year dollars
    pub fn get_value_change_factor(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Result<ValueChangeResponse> {
        let factor = self.calculator.value_change_factor(start_year, end_year)?;
        info!("Calculated value change from {} to {}: {}", start_year, end_year, factor);
        Ok(ValueChangeResponse::new(start_year, end_year, factor))
    }

    /// Get the value of `amount` from `original_year` in the latest year with data
    pub fn get_current_value(
        &self,
        original_year: i32,
        amount: Decimal,
    ) -> Result<CurrentValueResponse> {
        let series = self.calculator.repository().snapshot()?;
        let current_year = series.max_year();
        let value = value_in_year(&series, original_year, current_year, amount)?;
        info!(
            "Calculated current value: ${} from {} = ${} in {}",
            amount, original_year, value, current_year
        );
        Ok(CurrentValueResponse::new(original_year, current_year, amount, value))
    }

    /// Get the value of `amount` from `original_year` in `target_year`
    pub fn get_current_value_in(
        &self,
        original_year: i32,
        target_year: i32,
        amount: Decimal,
    ) -> Result<CurrentValueResponse> {
        let value = self.calculator.current_value_in(original_year, target_year, amount)?;
        info!(
            "Calculated current value: ${} from {} = ${} in {}",
            amount, original_year, value, target_year
        );
        Ok(CurrentValueResponse::new(original_year, target_year, amount, value))
    }

    /// Get the range of years with data
    pub fn get_coverage(&self) -> Result<CoverageResponse> {
        let series = self.calculator.repository().snapshot()?;
        let (min_year, max_year) = series.coverage();
        Ok(CoverageResponse {
            min_year,
            max_year,
            years_available: series.len(),
        })
    }

    /// Reload the backing source and publish the new series
    pub fn reload(&self) -> Result<LoadReport> {
        let outcome = self.calculator.repository().reload()?;
        Ok(outcome.report)
    }

    /// Report of the most recent successful load
    pub fn load_report(&self) -> Option<LoadReport> {
        self.calculator.repository().last_report()
    }
}
