use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, Result};
use crate::loader::load_series;
use crate::types::{LoadOutcome, LoadReport, RateSeries, RateSource};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything produced by one successful load, published as a unit
#[derive(Debug)]
struct Published {
    series: Arc<RateSeries>,
    report: LoadReport,
    source: RateSource,
}

/// Rate Repository - owns the loaded inflation-rate series
///
/// The repository reads a year/rate table, keeps the validated series in
/// memory and hands it out as read-only snapshots. A reload builds the new
/// series completely before swapping it in, so readers only ever see a
/// whole series.
#[derive(Debug)]
pub struct RateRepository {
    config: RepositoryConfig,

    /// Latest published load; the lock is held only to swap or clone the pointer
    current: RwLock<Option<Arc<Published>>>,
}

impl RateRepository {
    /// Create an empty repository
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            current: RwLock::new(None),
        })
    }

    /// Create a repository and load the file named by `config.data_path`
    pub fn open(config: RepositoryConfig) -> Result<Self> {
        let source = RateSource::File(config.data_path.clone());
        Self::with_source(config, &source)
    }

    /// Create a repository and load the given source
    pub fn with_source(config: RepositoryConfig, source: &RateSource) -> Result<Self> {
        let repository = Self::new(config)?;
        repository.load(source)?;
        Ok(repository)
    }

    /// Load a source and publish the resulting series.
    ///
    /// Malformed rows are skipped and listed in the returned report. On
    /// failure the previously published series, if any, stays in place.
    pub fn load(&self, source: &RateSource) -> Result<LoadOutcome> {
        info!("Loading inflation data from {}", source);

        let (series, report) = load_series(source, &self.config)?;
        let series = Arc::new(series);

        if !report.is_clean() {
            warn!(
                "Skipped {} of {} rows while loading {}",
                report.skipped_total, report.rows_read, source
            );
        }

        let published = Arc::new(Published {
            series: series.clone(),
            report: report.clone(),
            source: source.clone(),
        });
        *self.current.write() = Some(published);

        let (min_year, max_year) = series.coverage();
        info!(
            "Successfully loaded {} inflation records covering {}-{}",
            series.len(),
            min_year,
            max_year
        );

        Ok(LoadOutcome { series, report })
    }

    /// Re-read the source of the last successful load
    pub fn reload(&self) -> Result<LoadOutcome> {
        let source = self.published()?.source.clone();
        self.load(&source)
    }

    /// Current series snapshot
    pub fn snapshot(&self) -> Result<Arc<RateSeries>> {
        Ok(self.published()?.series.clone())
    }

    /// Whether a series has been published
    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Get the inflation rate recorded for a year
    pub fn rate_for_year(&self, year: i32) -> Result<Decimal> {
        self.snapshot()?.rate_for_year(year)
    }

    /// Get all years with data; empty before the first load
    pub fn years(&self) -> BTreeSet<i32> {
        self.snapshot().map(|series| series.years()).unwrap_or_default()
    }

    /// Get the (min_year, max_year) range of the loaded data
    pub fn coverage(&self) -> Result<(i32, i32)> {
        Ok(self.snapshot()?.coverage())
    }

    /// Get a copy of every year/rate pair
    pub fn all_rates(&self) -> Result<BTreeMap<i32, Decimal>> {
        Ok(self.snapshot()?.rates().clone())
    }

    /// Report of the last successful load
    pub fn last_report(&self) -> Option<LoadReport> {
        self.current.read().as_ref().map(|published| published.report.clone())
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn published(&self) -> Result<Arc<Published>> {
        self.current.read().clone().ok_or(RepositoryError::EmptySeries)
    }
}
