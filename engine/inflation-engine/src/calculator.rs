use crate::error::{CalculationError, Result};
use rate_repository::{RateRepository, RateSeries};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Inflation calculator for purchasing-power conversions
///
/// Every operation works on a single snapshot of the repository's series,
/// so a reload that lands mid-calculation cannot mix two data sets.
#[derive(Debug, Clone)]
pub struct InflationCalculator {
    repository: Arc<RateRepository>,
}

impl InflationCalculator {
    /// Create a new calculator over a repository
    pub fn new(repository: Arc<RateRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<RateRepository> {
        &self.repository
    }

    /// Get the (min_year, max_year) range of the loaded data
    pub fn coverage(&self) -> Result<(i32, i32)> {
        Ok(self.repository.coverage()?)
    }

    /// Get the inflation rate recorded for a year
    pub fn rate_in_year(&self, year: i32) -> Result<Decimal> {
        let series = self.repository.snapshot()?;
        ensure_covered(&series, year)?;
        Ok(series.rate_for_year(year)?)
    }

    /// Calculate the factor F with `value_in(start_year) = F * value_in(end_year)`
    pub fn value_change_factor(&self, start_year: i32, end_year: i32) -> Result<Decimal> {
        let series = self.repository.snapshot()?;
        let factor = value_change_factor(&series, start_year, end_year)?;
        debug!("Value change factor from {} to {}: {}", start_year, end_year, factor);
        Ok(factor)
    }

    /// Value of `amount` dated `original_year` in the latest year with data
    pub fn current_value(&self, original_year: i32, amount: Decimal) -> Result<Decimal> {
        let series = self.repository.snapshot()?;
        let target_year = series.max_year();
        let value = value_in_year(&series, original_year, target_year, amount)?;
        debug!("${} from {} = ${} in {}", amount, original_year, value, target_year);
        Ok(value)
    }

    /// Value of one dollar dated `original_year` in the latest year with data
    pub fn current_value_of_one(&self, original_year: i32) -> Result<Decimal> {
        self.current_value(original_year, Decimal::ONE)
    }

    /// Value of `amount` dated `original_year` in an explicit target year
    pub fn current_value_in(
        &self,
        original_year: i32,
        target_year: i32,
        amount: Decimal,
    ) -> Result<Decimal> {
        let series = self.repository.snapshot()?;
        let value = value_in_year(&series, original_year, target_year, amount)?;
        debug!("${} from {} = ${} in {}", amount, original_year, value, target_year);
        Ok(value)
    }
}

/// Fail with `YearNotFound` unless the year lies within the series coverage
pub fn ensure_covered(series: &RateSeries, year: i32) -> Result<()> {
    if series.covers(year) {
        Ok(())
    } else {
        Err(CalculationError::YearNotFound(year))
    }
}

/// Value-change factor between two years of a series.
///
/// For `start_year < end_year` this is the product of `1 + rate(y) / 100`
/// over `y` in `start_year + 1 ..= end_year`; the reverse direction is the
/// reciprocal of that product and equal years give exactly one.
///
/// Products are exact while they fit in `Decimal`'s 28 fractional digits,
/// which covers about nine years of one-decimal rates. Longer spans are
/// rounded to 28 digits at each step, so the result may differ from the
/// exact product in the last few places.
pub fn value_change_factor(series: &RateSeries, start_year: i32, end_year: i32) -> Result<Decimal> {
    ensure_covered(series, start_year)?;
    ensure_covered(series, end_year)?;

    match start_year.cmp(&end_year) {
        Ordering::Equal => Ok(Decimal::ONE),
        Ordering::Less => compound_growth(series, start_year, end_year),
        Ordering::Greater => {
            let forward = compound_growth(series, end_year, start_year)?;
            Decimal::ONE.checked_div(forward).ok_or_else(|| {
                CalculationError::arithmetic(start_year, end_year, "division by zero")
            })
        }
    }
}

/// `amount * value_change_factor(original_year, target_year)`
pub fn value_in_year(
    series: &RateSeries,
    original_year: i32,
    target_year: i32,
    amount: Decimal,
) -> Result<Decimal> {
    ensure_covered(series, original_year)?;
    ensure_covered(series, target_year)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CalculationError::invalid_amount(amount));
    }

    let factor = value_change_factor(series, original_year, target_year)?;
    amount
        .checked_mul(factor)
        .ok_or_else(|| CalculationError::arithmetic(original_year, target_year, "overflow"))
}

/// Product of `1 + rate(y) / 100` for `y` in `from + 1 ..= to`, with `from < to`
fn compound_growth(series: &RateSeries, from: i32, to: i32) -> Result<Decimal> {
    let mut factor = Decimal::ONE;
    for year in (from + 1)..=to {
        let rate = series.rate_for_year(year)?;
        let growth = Decimal::ONE + rate / ONE_HUNDRED;
        factor = factor
            .checked_mul(growth)
            .ok_or_else(|| CalculationError::arithmetic(from, to, "overflow"))?;
    }
    Ok(factor)
}

/// Parse a user-supplied amount, rejecting negative and non-finite values
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let text = text.trim();
    let amount = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| CalculationError::InvalidAmount(text.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CalculationError::invalid_amount(amount));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rate_repository::{RateRecord, RateSource, RepositoryConfig};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(rows: &[(i32, &str)]) -> RateSeries {
        let records = rows.iter().map(|&(year, rate)| RateRecord::new(year, dec(rate)));
        RateSeries::from_records(records).unwrap()
    }

    fn sample_calculator() -> InflationCalculator {
        let source = RateSource::inline(
            "sample",
            "year,rate\n2015,0.1\n2016,1.3\n2017,2.1\n2018,2.4\n2019,1.8\n2020,1.2\n",
        );
        let repository = RateRepository::with_source(RepositoryConfig::default(), &source).unwrap();
        InflationCalculator::new(Arc::new(repository))
    }

    #[test]
    fn test_rate_in_year() {
        let calculator = sample_calculator();
        assert_eq!(calculator.rate_in_year(2020).unwrap(), dec("1.2"));
        assert_eq!(calculator.rate_in_year(2015).unwrap(), dec("0.1"));
        assert_eq!(
            calculator.rate_in_year(2014),
            Err(CalculationError::YearNotFound(2014))
        );
        assert_eq!(
            calculator.rate_in_year(2021),
            Err(CalculationError::YearNotFound(2021))
        );
    }

    #[test]
    fn test_value_change_factor_matches_exact_product() {
        let calculator = sample_calculator();
        let expected = dec("1.013") * dec("1.021") * dec("1.024") * dec("1.018") * dec("1.012");

        let factor = calculator.value_change_factor(2015, 2020).unwrap();
        assert_eq!(factor, expected);
        assert_eq!(factor, dec("1.091097183199232"));
    }

    #[test]
    fn test_value_change_factor_uses_rates_after_start_year() {
        let calculator = sample_calculator();
        // The rate of the start year itself is never applied.
        assert_eq!(calculator.value_change_factor(2015, 2016).unwrap(), dec("1.013"));
        assert_eq!(calculator.value_change_factor(2019, 2020).unwrap(), dec("1.012"));
    }

    #[test]
    fn test_value_change_factor_same_year_is_one() {
        let calculator = sample_calculator();
        for year in 2015..=2020 {
            assert_eq!(calculator.value_change_factor(year, year).unwrap(), Decimal::ONE);
        }
    }

    #[test]
    fn test_value_change_factor_backwards_is_reciprocal() {
        let calculator = sample_calculator();
        let forward = calculator.value_change_factor(2016, 2019).unwrap();
        let backward = calculator.value_change_factor(2019, 2016).unwrap();

        assert_eq!(backward, Decimal::ONE / forward);
        assert!(backward < Decimal::ONE);
    }

    #[test]
    fn test_value_change_factor_names_offending_year() {
        let calculator = sample_calculator();
        assert_eq!(
            calculator.value_change_factor(2010, 2020),
            Err(CalculationError::YearNotFound(2010))
        );
        assert_eq!(
            calculator.value_change_factor(2015, 2025),
            Err(CalculationError::YearNotFound(2025))
        );
        assert_eq!(
            calculator.value_change_factor(2030, 2030),
            Err(CalculationError::YearNotFound(2030))
        );
    }

    #[test]
    fn test_gap_inside_span_is_reported() {
        let sparse = series(&[(2000, "3.4"), (2001, "2.8"), (2003, "2.3"), (2004, "2.7")]);

        assert_eq!(
            value_change_factor(&sparse, 2000, 2004),
            Err(CalculationError::YearNotFound(2002))
        );
        assert_eq!(
            value_change_factor(&sparse, 2004, 2000),
            Err(CalculationError::YearNotFound(2002))
        );
        assert_eq!(value_change_factor(&sparse, 2003, 2004).unwrap(), dec("1.027"));
        // The start year's own rate is not needed, so a gap there is fine.
        assert_eq!(value_change_factor(&sparse, 2002, 2003).unwrap(), dec("1.023"));
    }

    #[test]
    fn test_deflation_years() {
        let rates = series(&[(2008, "3.8"), (2009, "-0.4"), (2010, "1.6")]);
        assert_eq!(value_change_factor(&rates, 2008, 2009).unwrap(), dec("0.996"));
        assert_eq!(
            value_change_factor(&rates, 2008, 2010).unwrap(),
            dec("0.996") * dec("1.016")
        );
    }

    #[test]
    fn test_total_loss_reverse_factor_is_arithmetic_error() {
        let rates = series(&[(1999, "1.0"), (2000, "-100")]);
        assert_eq!(value_change_factor(&rates, 1999, 2000).unwrap(), Decimal::ZERO);
        assert!(matches!(
            value_change_factor(&rates, 2000, 1999),
            Err(CalculationError::Arithmetic {
                start_year: 2000,
                end_year: 1999,
                ..
            })
        ));
    }

    #[test]
    fn test_current_value() {
        let calculator = sample_calculator();
        let expected =
            dec("100") * dec("1.013") * dec("1.021") * dec("1.024") * dec("1.018") * dec("1.012");

        let value = calculator.current_value(2015, dec("100")).unwrap();
        assert_eq!(value, expected);
        assert_eq!(value.round_dp(2), dec("109.11"));
        assert_eq!(calculator.current_value(2020, dec("100")).unwrap(), dec("100"));
    }

    #[test]
    fn test_current_value_of_one() {
        let calculator = sample_calculator();
        assert_eq!(
            calculator.current_value_of_one(2015).unwrap(),
            dec("1.091097183199232")
        );
        assert_eq!(calculator.current_value_of_one(2020).unwrap(), Decimal::ONE);
        assert_eq!(
            calculator.current_value_of_one(2021),
            Err(CalculationError::YearNotFound(2021))
        );
    }

    #[test]
    fn test_long_span_rounds_to_decimal_precision() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/inflation_data.csv");
        let repository =
            RateRepository::with_source(RepositoryConfig::default(), &RateSource::file(path))
                .unwrap();
        let calculator = InflationCalculator::new(Arc::new(repository));

        let factor = calculator.value_change_factor(2000, 2024).unwrap();
        assert_eq!(factor.scale(), 28);
        assert_eq!(factor, dec("1.8175061688871065756159253062"));

        // Exact product rounded once to 28 places
        let exact = dec("1.8175061688871065756159253064");
        assert!((factor - exact).abs() <= dec("0.0000000000000000000000000010"));
    }

    #[test]
    fn test_current_value_of_zero_is_zero() {
        let calculator = sample_calculator();
        for year in 2015..=2020 {
            assert_eq!(
                calculator.current_value(year, Decimal::ZERO).unwrap(),
                Decimal::ZERO
            );
        }
    }

    #[test]
    fn test_current_value_rejects_negative_amount() {
        let calculator = sample_calculator();
        assert_eq!(
            calculator.current_value(2015, dec("-5.00")),
            Err(CalculationError::InvalidAmount("-5.00".to_string()))
        );
        assert_eq!(
            calculator.current_value(1990, dec("5")),
            Err(CalculationError::YearNotFound(1990))
        );
    }

    #[test]
    fn test_current_value_in_explicit_year() {
        let calculator = sample_calculator();

        let forward = calculator.current_value_in(2015, 2018, dec("50")).unwrap();
        assert_eq!(forward, dec("50") * dec("1.013") * dec("1.021") * dec("1.024"));

        let backward = calculator.current_value_in(2018, 2015, dec("50")).unwrap();
        let growth = dec("1.013") * dec("1.021") * dec("1.024");
        assert_eq!(backward, dec("50") * (Decimal::ONE / growth));

        assert_eq!(
            calculator.current_value_in(2015, 2022, dec("1")),
            Err(CalculationError::YearNotFound(2022))
        );
    }

    #[test]
    fn test_calculations_before_load_report_empty_series() {
        let repository = RateRepository::new(RepositoryConfig::default()).unwrap();
        let calculator = InflationCalculator::new(Arc::new(repository));

        assert_eq!(calculator.coverage(), Err(CalculationError::EmptySeries));
        assert_eq!(calculator.rate_in_year(2020), Err(CalculationError::EmptySeries));
        assert_eq!(
            calculator.value_change_factor(2019, 2020),
            Err(CalculationError::EmptySeries)
        );
        assert_eq!(
            calculator.current_value(2019, Decimal::ONE),
            Err(CalculationError::EmptySeries)
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), dec("100"));
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec("12.50"));
        assert_eq!(parse_amount("1e3").unwrap(), dec("1000"));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("-0").unwrap(), Decimal::ZERO);
        assert!(matches!(parse_amount("-1"), Err(CalculationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("NaN"), Err(CalculationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("inf"), Err(CalculationError::InvalidAmount(_))));
        assert!(matches!(parse_amount("ten"), Err(CalculationError::InvalidAmount(_))));
    }
}
