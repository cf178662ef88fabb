//! Type definitions for the rate repository

use crate::error::{RepositoryError, RowError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Earliest year a rate may be recorded for
pub const MIN_PLAUSIBLE_YEAR: i32 = 1800;

/// Latest year a rate may be recorded for
pub const MAX_PLAUSIBLE_YEAR: i32 = 2100;

/// Check whether a year lies within the plausibility bound
pub fn is_plausible_year(year: i32) -> bool {
    (MIN_PLAUSIBLE_YEAR..=MAX_PLAUSIBLE_YEAR).contains(&year)
}

/// Inflation realized during one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// Calendar year the rate applies to
    pub year: i32,

    /// Inflation rate in percent (1.4 means 1.4%)
    pub rate: Decimal,
}

impl RateRecord {
    pub fn new(year: i32, rate: Decimal) -> Self {
        Self { year, rate }
    }
}

/// Immutable, validated year -> rate mapping.
///
/// A series always holds at least one year, and its cached coverage is the
/// smallest and largest year actually present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSeries {
    rates: BTreeMap<i32, Decimal>,
    min_year: i32,
    max_year: i32,
}

impl RateSeries {
    /// Build a series from records; later records for the same year win.
    pub fn from_records<I>(records: I) -> Result<Self, RepositoryError>
    where
        I: IntoIterator<Item = RateRecord>,
    {
        let mut rates = BTreeMap::new();
        for record in records {
            if !is_plausible_year(record.year) {
                return Err(RepositoryError::YearOutOfRange(record.year));
            }
            rates.insert(record.year, record.rate);
        }
        Self::from_map(rates)
    }

    pub(crate) fn from_map(rates: BTreeMap<i32, Decimal>) -> Result<Self, RepositoryError> {
        let (min_year, max_year) = match (rates.keys().next(), rates.keys().next_back()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Err(RepositoryError::EmptySeries),
        };
        Ok(Self {
            rates,
            min_year,
            max_year,
        })
    }

    /// Rate recorded for a year
    pub fn rate_for_year(&self, year: i32) -> Result<Decimal, RepositoryError> {
        self.rates.get(&year).copied().ok_or(RepositoryError::YearNotFound(year))
    }

    /// Inclusive (min_year, max_year) range of the data
    pub fn coverage(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Whether a year lies within the coverage range (it may still be a gap)
    pub fn covers(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.rates.contains_key(&year)
    }

    /// All years present in the series
    pub fn years(&self) -> BTreeSet<i32> {
        self.rates.keys().copied().collect()
    }

    /// Borrow the underlying mapping
    pub fn rates(&self) -> &BTreeMap<i32, Decimal> {
        &self.rates
    }

    /// Iterate records in year order
    pub fn records(&self) -> impl Iterator<Item = RateRecord> + '_ {
        self.rates.iter().map(|(&year, &rate)| RateRecord { year, rate })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Where a rate table is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateSource {
    /// CSV file on disk
    File(PathBuf),

    /// CSV text held in memory
    Inline { name: String, contents: String },
}

impl RateSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::Inline {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Display name used in logs, reports and errors
    pub fn name(&self) -> String {
        match self {
            RateSource::File(path) => path.display().to_string(),
            RateSource::Inline { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A row that was skipped during a load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based line number in the source
    pub row_number: u64,

    /// Row fields joined with commas, as read
    pub raw_content: String,

    /// Why the row was rejected
    pub reason: RowError,
}

/// Data-quality summary of one load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Display name of the source that was read
    pub source: String,

    /// Data rows seen, header excluded
    pub rows_read: usize,

    /// Rows that produced a record
    pub rows_loaded: usize,

    /// Number of rows skipped, including those not kept in `skipped`
    pub skipped_total: usize,

    /// First skipped rows, capped by `max_reported_skips`
    pub skipped: Vec<SkippedRow>,

    /// Years that appeared more than once; the last occurrence won
    pub duplicate_years: Vec<i32>,
}

impl LoadReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Whether every data row was loaded
    pub fn is_clean(&self) -> bool {
        self.skipped_total == 0
    }
}

/// A freshly published series together with its load report
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub series: Arc<RateSeries>,
    pub report: LoadReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(year: i32, rate: &str) -> RateRecord {
        RateRecord::new(year, Decimal::from_str(rate).unwrap())
    }

    #[test]
    fn test_series_coverage_tracks_data() {
        let series = RateSeries::from_records(vec![
            record(2019, "1.8"),
            record(2015, "0.1"),
            record(2020, "1.2"),
        ])
        .unwrap();

        assert_eq!(series.coverage(), (2015, 2020));
        assert_eq!(series.len(), 3);
        assert!(series.covers(2017));
        assert!(!series.contains_year(2017));
        assert_eq!(series.years().into_iter().collect::<Vec<_>>(), vec![2015, 2019, 2020]);
    }

    #[test]
    fn test_series_lookup() {
        let series = RateSeries::from_records(vec![record(2020, "1.2")]).unwrap();
        assert_eq!(series.rate_for_year(2020).unwrap(), Decimal::from_str("1.2").unwrap());
        assert_eq!(series.rate_for_year(2021), Err(RepositoryError::YearNotFound(2021)));
    }

    #[test]
    fn test_series_last_record_wins() {
        let series =
            RateSeries::from_records(vec![record(2020, "1.2"), record(2020, "1.4")]).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.rate_for_year(2020).unwrap(), Decimal::from_str("1.4").unwrap());
    }

    #[test]
    fn test_series_rejects_empty_and_implausible() {
        assert_eq!(RateSeries::from_records(Vec::new()), Err(RepositoryError::EmptySeries));
        assert_eq!(
            RateSeries::from_records(vec![record(1799, "1.0")]),
            Err(RepositoryError::YearOutOfRange(1799))
        );
    }

    #[test]
    fn test_source_names() {
        assert_eq!(RateSource::file("data/rates.csv").name(), "data/rates.csv");
        assert_eq!(RateSource::inline("fixture", "year,rate").to_string(), "fixture");
    }
}
