//! Raw record validation and series normalization.
//!
//! Turns textual rows into a [`Series`]: dates parsed to calendar days,
//! duplicate dates resolved (last row wins), zero-volume days dropped and
//! everything sorted ascending.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use crossover_core::{Error, RawRecord, Record, Result, Series};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Date-only formats accepted for the date column. Slash dates without a
/// leading year are read month first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time formats whose time part is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Statistics about a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows supplied.
    pub total_records: usize,
    /// Rows replaced by a later row with the same date.
    pub duplicate_dates: usize,
    /// Rows dropped for having zero volume.
    pub zero_volume_dropped: usize,
}

impl LoadStats {
    /// Rows that made it into the series.
    pub fn kept(&self) -> usize {
        self.total_records - self.duplicate_dates - self.zero_volume_dropped
    }
}

/// Parse a calendar date, ignoring any time-of-day component.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Load raw records into a normalized series.
pub fn load_series(raw: impl IntoIterator<Item = RawRecord>) -> Result<Series> {
    load_series_with_stats(raw).map(|(series, _)| series)
}

/// Load raw records, also reporting what normalization removed.
///
/// Fails on the first invalid row; nothing is returned in that case.
pub fn load_series_with_stats(
    raw: impl IntoIterator<Item = RawRecord>,
) -> Result<(Series, LoadStats)> {
    let mut stats = LoadStats::default();
    let mut by_date: BTreeMap<NaiveDate, Record> = BTreeMap::new();

    for (row, raw_record) in raw.into_iter().enumerate() {
        stats.total_records += 1;
        let record = parse_record(row + 1, &raw_record)?;
        if by_date.insert(record.date, record).is_some() {
            stats.duplicate_dates += 1;
        }
    }

    let before = by_date.len();
    by_date.retain(|_, record| record.volume != 0.0);
    stats.zero_volume_dropped = before - by_date.len();

    debug!(
        total = stats.total_records,
        duplicates = stats.duplicate_dates,
        zero_volume = stats.zero_volume_dropped,
        kept = stats.kept(),
        "Normalized series"
    );

    Ok((Series::from_records(by_date.into_values().collect()), stats))
}

/// Validate one row. `row` is 1-based and only used in messages.
fn parse_record(row: usize, raw: &RawRecord) -> Result<Record> {
    let date = parse_date(&raw.date).ok_or_else(|| {
        Error::malformed_input(format!("record {}: cannot parse date {:?}", row, raw.date))
    })?;

    Ok(Record {
        date,
        open: parse_optional(row, "Open", raw.open.as_deref()),
        high: parse_optional(row, "High", raw.high.as_deref()),
        low: parse_optional(row, "Low", raw.low.as_deref()),
        close: parse_required(row, "Close", raw.close.as_deref())?,
        volume: parse_required(row, "Volume", raw.volume.as_deref())?,
    })
}

/// Missing, empty, non-numeric and non-finite values are all errors.
fn parse_required(row: usize, field: &str, value: Option<&str>) -> Result<f64> {
    let text = non_empty(value).ok_or_else(|| {
        Error::malformed_input(format!("record {}: missing required field {}", row, field))
    })?;
    parse_finite(text).ok_or_else(|| {
        Error::malformed_input(format!(
            "record {}: field {} is not numeric: {:?}",
            row, field, text
        ))
    })
}

/// Unusable text in a non-required column is dropped, not rejected.
fn parse_optional(row: usize, field: &str, value: Option<&str>) -> Option<f64> {
    let text = non_empty(value)?;
    let parsed = parse_finite(text);
    if parsed.is_none() {
        warn!(record = row, field, value = text, "Ignoring non-numeric value");
    }
    parsed
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("2024/03/05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05 16:00:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05T09:30:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05T23:30:00+02:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date(" 2024-03-05 "), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_date_month_first_slashes() {
        assert_eq!(parse_date("01/02/2024"), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("12/31/2023"), Some(date(2023, 12, 31)));
        // Day-first only dates are not guessed at
        assert_eq!(parse_date("31/12/2023"), None);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_load_sorts_ascending() {
        let series = load_series(vec![
            RawRecord::new("2024-01-03", "12", "100"),
            RawRecord::new("2024-01-01", "10", "100"),
            RawRecord::new("2024-01-02", "11", "100"),
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_load_full_ohlcv() {
        let series = load_series(vec![RawRecord::ohlcv(
            "2024-01-02", "10.5", "11.25", "10.0", "11.0", "1500",
        )])
        .unwrap();

        let record = &series.records()[0];
        assert_relative_eq!(record.open.unwrap(), 10.5);
        assert_relative_eq!(record.high.unwrap(), 11.25);
        assert_relative_eq!(record.low.unwrap(), 10.0);
        assert_relative_eq!(record.close, 11.0);
        assert_relative_eq!(record.volume, 1500.0);
    }

    #[test]
    fn test_zero_volume_dropped() {
        let (series, stats) = load_series_with_stats(vec![
            RawRecord::new("2024-01-01", "10", "100"),
            RawRecord::new("2024-01-02", "10", "0"),
            RawRecord::new("2024-01-03", "11", "100"),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(stats.zero_volume_dropped, 1);
        assert_eq!(stats.kept(), 2);
        assert!(series.records().iter().all(|r| r.date != date(2024, 1, 2)));
    }

    #[test]
    fn test_duplicate_date_last_wins() {
        let (series, stats) = load_series_with_stats(vec![
            RawRecord::new("2024-01-01", "10", "100"),
            RawRecord::new("2024-01-01", "15", "100"),
        ])
        .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(stats.duplicate_dates, 1);
        assert_relative_eq!(series.records()[0].close, 15.0);
    }

    #[test]
    fn test_non_numeric_close_rejected() {
        let err = load_series(vec![
            RawRecord::new("2024-01-01", "10", "100"),
            RawRecord::new("2024-01-02", "abc", "100"),
        ])
        .unwrap_err();

        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn test_nan_close_rejected() {
        let err = load_series(vec![RawRecord::new("2024-01-01", "NaN", "100")]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_missing_volume_rejected() {
        let raw = RawRecord {
            date: "2024-01-01".to_string(),
            close: Some("10".to_string()),
            ..RawRecord::default()
        };
        let err = load_series(vec![raw]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("Volume"));
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = load_series(vec![RawRecord::new("01-2024-99", "10", "100")]).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        let raw = RawRecord {
            open: Some(String::new()),
            ..RawRecord::new("2024-01-01", "10", "100")
        };
        let series = load_series(vec![raw]).unwrap();
        assert_eq!(series.records()[0].open, None);
    }

    #[test]
    fn test_non_numeric_optional_becomes_absent() {
        let series = load_series(vec![
            RawRecord {
                open: Some("null".to_string()),
                high: Some("n/a".to_string()),
                low: Some("inf".to_string()),
                ..RawRecord::new("2024-01-01", "10", "100")
            },
            RawRecord::new("2024-01-02", "11", "100"),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        let first = &series.records()[0];
        assert_eq!(first.open, None);
        assert_eq!(first.high, None);
        assert_eq!(first.low, None);
        assert_relative_eq!(first.close, 10.0);
    }

    #[test]
    fn test_missing_close_rejected() {
        let raw = RawRecord {
            close: Some("   ".to_string()),
            ..RawRecord::new("2024-01-01", "10", "100")
        };
        let err = load_series(vec![raw]).unwrap_err();
        assert!(err.to_string().contains("missing required field Close"));
    }

    #[test]
    fn test_empty_input() {
        let series = load_series(Vec::new()).unwrap();
        assert!(series.is_empty());
    }
}
