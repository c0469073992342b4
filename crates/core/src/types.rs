//! Core data types for the crossover analyzer.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One unparsed input row, as read from a delimited file.
///
/// Numeric fields stay textual until the loader validates them, so a bad
/// value can be reported instead of silently coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Date text (calendar day, optional time part).
    pub date: String,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub close: Option<String>,
    pub volume: Option<String>,
}

impl RawRecord {
    /// Create a record carrying only the required fields.
    pub fn new(
        date: impl Into<String>,
        close: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            close: Some(close.into()),
            volume: Some(volume.into()),
            ..Self::default()
        }
    }

    /// Create a record with all five price/volume fields.
    pub fn ohlcv(
        date: impl Into<String>,
        open: impl Into<String>,
        high: impl Into<String>,
        low: impl Into<String>,
        close: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            open: Some(open.into()),
            high: Some(high.into()),
            low: Some(low.into()),
            close: Some(close.into()),
            volume: Some(volume.into()),
        }
    }
}

/// A validated daily OHLCV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Trading day.
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: f64,
}

impl Record {
    /// Create a record with only close and volume.
    pub fn new(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume,
        }
    }
}

/// A date-ordered series with one record per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    records: Vec<Record>,
}

impl Series {
    /// Build a series from records in any order.
    ///
    /// Records are sorted ascending by date; when two share a date the later
    /// one in `records` wins.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut by_date = BTreeMap::new();
        for record in records {
            by_date.insert(record.date, record);
        }
        Self {
            records: by_date.into_values().collect(),
        }
    }

    /// Records in ascending date order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// First and last date, or None for an empty series.
    pub fn date_span(&self) -> Option<DateRange> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some(DateRange::new(first.date, last.date))
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range. `start > end` is allowed and matches nothing.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Check whether `date` lies within both bounds.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when no date can satisfy the range.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Two validated SMA window lengths.
///
/// Keeps the order the caller supplied them in for labelling, but
/// `short()`/`long()` are chosen by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowPairFields")]
pub struct WindowPair {
    first: usize,
    second: usize,
}

/// Unvalidated wire form of [`WindowPair`].
#[derive(Deserialize)]
struct WindowPairFields {
    first: usize,
    second: usize,
}

impl TryFrom<WindowPairFields> for WindowPair {
    type Error = Error;

    fn try_from(fields: WindowPairFields) -> Result<Self> {
        WindowPair::new(fields.first, fields.second)
    }
}

impl WindowPair {
    /// Validate two window lengths.
    pub fn new(first: usize, second: usize) -> Result<Self> {
        for window in [first, second] {
            if window == 0 {
                return Err(Error::invalid_window(format!(
                    "window length must be a positive integer, got {}",
                    window
                )));
            }
        }
        Ok(Self { first, second })
    }

    /// Window as supplied first.
    pub fn first(&self) -> usize {
        self.first
    }

    /// Window as supplied second.
    pub fn second(&self) -> usize {
        self.second
    }

    /// The smaller (faster) window.
    pub fn short(&self) -> usize {
        self.first.min(self.second)
    }

    /// The larger (slower) window.
    pub fn long(&self) -> usize {
        self.first.max(self.second)
    }

    /// Equal windows never produce crossings.
    pub fn is_degenerate(&self) -> bool {
        self.first == self.second
    }
}

/// Column label for an average, e.g. "20d".
pub fn column_label(window: usize) -> String {
    format!("{}d", window)
}

/// Legend text for an average, e.g. "20 Day Average".
pub fn legend_label(window: usize) -> String {
    format!("{} Day Average", window)
}

/// Direction of a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Fast average rose above the slow one.
    Buy,
    /// Fast average fell to or below the slow one.
    Sell,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Buy => f.pad("BUY"),
            EdgeKind::Sell => f.pad("SELL"),
        }
    }
}

/// A single crossover event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub date: NaiveDate,
    pub kind: EdgeKind,
    /// Close on the crossing date.
    pub close: f64,
}

/// A record plus its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    #[serde(flatten)]
    pub record: Record,
    /// SMA over the shorter window, absent until the window is full.
    pub avg_short: Option<f64>,
    /// SMA over the longer window, absent until the window is full.
    pub avg_long: Option<f64>,
    /// Close at a sell crossing.
    pub sell_marker: Option<f64>,
    /// Close at a buy crossing.
    pub buy_marker: Option<f64>,
}

impl AnnotatedRow {
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.record.date
    }

    /// Crossover at this row, if any.
    pub fn edge(&self) -> Option<EdgeKind> {
        match (self.buy_marker, self.sell_marker) {
            (Some(_), _) => Some(EdgeKind::Buy),
            (None, Some(_)) => Some(EdgeKind::Sell),
            (None, None) => None,
        }
    }
}

/// A series annotated with two SMAs and crossover markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedSeries {
    windows: WindowPair,
    rows: Vec<AnnotatedRow>,
}

impl AnnotatedSeries {
    /// Wrap rows that are already in ascending date order.
    pub fn new(windows: WindowPair, rows: Vec<AnnotatedRow>) -> Self {
        Self { windows, rows }
    }

    /// Windows the averages were computed with.
    pub fn windows(&self) -> WindowPair {
        self.windows
    }

    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last date, or None for an empty series.
    pub fn date_span(&self) -> Option<DateRange> {
        let first = self.rows.first()?;
        let last = self.rows.last()?;
        Some(DateRange::new(first.date(), last.date()))
    }

    /// Average column for a window length, or None if the series was not
    /// computed with that window.
    pub fn average(&self, window: usize) -> Option<Vec<Option<f64>>> {
        if window == self.windows.short() {
            Some(self.rows.iter().map(|r| r.avg_short).collect())
        } else if window == self.windows.long() {
            Some(self.rows.iter().map(|r| r.avg_long).collect())
        } else {
            None
        }
    }

    /// All crossovers in date order.
    pub fn edges(&self) -> Vec<Edge> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.edge().map(|kind| Edge {
                    date: row.date(),
                    kind,
                    close: row.record.close,
                })
            })
            .collect()
    }

    /// Keep the rows matching `keep`, preserving order and windows.
    pub fn retain_rows(&self, mut keep: impl FnMut(&AnnotatedRow) -> bool) -> Self {
        Self {
            windows: self.windows,
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}
