//! Load-then-update chart session.
//!
//! An interactive caller loads a series once and then re-derives signals
//! every time the windows or the visible date range change.

use crate::engine::{filter_by_date_range, CrossoverEngine};
use crossover_core::{AnnotatedSeries, DateRange, Error, RawRecord, Result, Series};
use crossover_ingestion::load_series;
use tracing::info;

/// Session state: either nothing loaded yet or a loaded series with the
/// engine that remembers the last windows.
#[derive(Debug, Clone, Default)]
pub enum ChartSession {
    #[default]
    NotLoaded,
    Loaded {
        series: Series,
        engine: CrossoverEngine,
    },
}

impl ChartSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load raw records, replacing any previous series.
    ///
    /// On failure the session keeps whatever it held before. Remembered
    /// windows survive a reload.
    pub fn load(&mut self, raw: impl IntoIterator<Item = RawRecord>) -> Result<()> {
        let series = load_series(raw)?;
        self.load_series(series);
        Ok(())
    }

    /// Install an already normalized series.
    pub fn load_series(&mut self, series: Series) {
        let engine = match std::mem::take(self) {
            ChartSession::Loaded { engine, .. } => engine,
            ChartSession::NotLoaded => CrossoverEngine::new(),
        };
        info!(rows = series.len(), range = ?series.date_span(), "Loaded series");

        *self = ChartSession::Loaded { series, engine };
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ChartSession::Loaded { .. })
    }

    /// The loaded series, if any.
    pub fn series(&self) -> Option<&Series> {
        match self {
            ChartSession::Loaded { series, .. } => Some(series),
            ChartSession::NotLoaded => None,
        }
    }

    /// First and last date of the loaded series.
    pub fn full_range(&self) -> Option<DateRange> {
        self.series().and_then(Series::date_span)
    }

    /// Recompute with new windows over the full series, then apply `range`.
    pub fn update(
        &mut self,
        window_a: usize,
        window_b: usize,
        range: Option<&DateRange>,
    ) -> Result<AnnotatedSeries> {
        let ChartSession::Loaded { series, engine } = self else {
            return Err(not_loaded());
        };
        let annotated = engine.compute(series, window_a, window_b)?;
        Ok(match range {
            Some(range) => filter_by_date_range(&annotated, range),
            None => annotated,
        })
    }

    /// Recompute with the last windows, then apply `range`.
    pub fn refresh(&self, range: Option<&DateRange>) -> Result<AnnotatedSeries> {
        match self {
            ChartSession::Loaded { series, engine } => engine.refresh(series, range),
            ChartSession::NotLoaded => Err(not_loaded()),
        }
    }
}

fn not_loaded() -> Error {
    Error::not_loaded("Please upload a valid CSV file first.")
}
