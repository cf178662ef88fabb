//! CSV parsing of year/rate tables into a validated series

use crate::config::RepositoryConfig;
use crate::error::{RepositoryError, Result, RowError};
use crate::types::{is_plausible_year, LoadReport, RateSeries, RateSource, SkippedRow};
use csv::{ByteRecord, StringRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::str::FromStr;
use tracing::{debug, warn};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Positions of the year and rate fields within a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndexes {
    year: usize,
    rate: usize,
}

impl Default for ColumnIndexes {
    fn default() -> Self {
        Self { year: 0, rate: 1 }
    }
}

/// Read a source and build a series plus its load report.
///
/// Row-level problems are recorded in the report; only an unreadable source
/// or one without a single valid row is an error.
pub(crate) fn load_series(
    source: &RateSource,
    config: &RepositoryConfig,
) -> Result<(RateSeries, LoadReport)> {
    let reader = open_source(source)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = LoadReport::new(source.name());
    let mut rates: BTreeMap<i32, Decimal> = BTreeMap::new();
    let mut columns: Option<ColumnIndexes> = None;

    for (idx, result) in reader.byte_records().enumerate() {
        let fallback_line = idx as u64 + 1;

        // Flexible byte records only fail on I/O
        let bytes = result
            .map_err(|e| RepositoryError::source_unavailable(source.name(), e.to_string()))?;
        let line = bytes.position().map(|p| p.line()).unwrap_or(fallback_line);

        let record = match StringRecord::from_byte_record(bytes) {
            Ok(record) => record,
            Err(e) => {
                columns.get_or_insert_with(ColumnIndexes::default);
                report.rows_read += 1;
                let reason = RowError::Unreadable(e.to_string());
                let content = lossy_content(&e.into_byte_record());
                record_skip(&mut report, config, line, content, reason);
                continue;
            }
        };

        let indexes = match columns {
            Some(indexes) => indexes,
            None => {
                let resolved = resolve_header(&record, config);
                columns = Some(resolved.unwrap_or_default());
                if resolved.is_some() || looks_like_header(&record) {
                    debug!("Skipping header row of {}: {}", source, raw_content(&record));
                    continue;
                }
                ColumnIndexes::default()
            }
        };

        report.rows_read += 1;
        match parse_row(&record, indexes, config) {
            Ok((year, rate)) => {
                if let Some(previous) = rates.insert(year, rate) {
                    debug!(
                        "Duplicate year {} at line {} of {}: {} replaces {}",
                        year, line, source, rate, previous
                    );
                    if !report.duplicate_years.contains(&year) {
                        report.duplicate_years.push(year);
                    }
                }
                report.rows_loaded += 1;
            }
            Err(reason) => {
                record_skip(&mut report, config, line, raw_content(&record), reason);
            }
        }
    }

    if rates.is_empty() {
        let reason = if report.rows_read == 0 {
            "source contains no data rows".to_string()
        } else {
            format!("none of the {} data rows could be parsed", report.rows_read)
        };
        return Err(RepositoryError::source_unavailable(source.name(), reason));
    }

    let series = RateSeries::from_map(rates)?;
    Ok((series, report))
}

fn open_source(source: &RateSource) -> Result<Box<dyn Read + '_>> {
    match source {
        RateSource::File(path) => {
            let file = File::open(path).map_err(|e| {
                let reason = format!("cannot open file: {e}");
                RepositoryError::source_unavailable(source.name(), reason)
            })?;
            Ok(Box::new(file))
        }
        RateSource::Inline { contents, .. } => Ok(Box::new(contents.as_bytes())),
    }
}

fn record_skip(
    report: &mut LoadReport,
    config: &RepositoryConfig,
    row_number: u64,
    raw_content: String,
    reason: RowError,
) {
    warn!(
        "Skipping invalid row {} of {}: '{}' - {}",
        row_number, report.source, raw_content, reason
    );
    report.skipped_total += 1;
    if report.skipped.len() < config.max_reported_skips {
        report.skipped.push(SkippedRow {
            row_number,
            raw_content,
            reason,
        });
    }
}

/// Locate the configured columns when the first row is a header naming them
fn resolve_header(record: &StringRecord, config: &RepositoryConfig) -> Option<ColumnIndexes> {
    let position = |name: &str| {
        record.iter().position(|field| {
            field.trim_start_matches(BYTE_ORDER_MARK).eq_ignore_ascii_case(name.trim())
        })
    };

    match (position(&config.columns.year), position(&config.columns.rate)) {
        (Some(year), Some(rate)) => Some(ColumnIndexes { year, rate }),
        _ => None,
    }
}

/// A first row whose leading field is not a number is a header.
///
/// Numeric but malformed years such as `2015.0` are data and go through
/// row validation instead.
fn looks_like_header(record: &StringRecord) -> bool {
    let first = record.get(0).unwrap_or_default().trim_start_matches(BYTE_ORDER_MARK);
    if is_numeric(first) {
        return false;
    }
    warn!(
        "Header row '{}' does not name the year and rate columns, using the first two columns",
        raw_content(record)
    );
    true
}

fn is_numeric(text: &str) -> bool {
    Decimal::from_str(text).is_ok() || Decimal::from_scientific(text).is_ok()
}

fn parse_row(
    record: &StringRecord,
    indexes: ColumnIndexes,
    config: &RepositoryConfig,
) -> std::result::Result<(i32, Decimal), RowError> {
    let year_text = field(record, indexes.year)?;
    let rate_text = field(record, indexes.rate)?;

    let year = parse_year(year_text)?;
    let rate = parse_rate(rate_text)?;

    if let Some(bounds) = config.rate_bounds {
        if !bounds.contains(rate) {
            return Err(RowError::RateOutOfBounds(rate));
        }
    }

    Ok((year, rate))
}

fn field(record: &StringRecord, index: usize) -> std::result::Result<&str, RowError> {
    match record.get(index).map(|f| f.trim_start_matches(BYTE_ORDER_MARK)) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RowError::MissingField),
    }
}

/// Parse a calendar year within the plausibility bound
pub fn parse_year(text: &str) -> std::result::Result<i32, RowError> {
    let year: i32 = text
        .trim()
        .parse()
        .map_err(|_| RowError::InvalidYear(text.to_string()))?;
    if !is_plausible_year(year) {
        return Err(RowError::YearOutOfRange(year));
    }
    Ok(year)
}

/// Parse a percentage rate as an exact decimal, plain or scientific notation
pub fn parse_rate(text: &str) -> std::result::Result<Decimal, RowError> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| RowError::InvalidRate(text.to_string()))
}

fn raw_content(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

fn lossy_content(record: &ByteRecord) -> String {
    record.iter().map(String::from_utf8_lossy).collect::<Vec<_>>().join(",")
}
