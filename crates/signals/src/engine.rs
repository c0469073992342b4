//! Crossover signal engine.
//!
//! Combines the rolling averages, trend state and edge detection into an
//! annotated series, and filters annotated series by date.

use crate::{
    crossover::{detect_edges, trend_states},
    rolling::rolling_mean,
};
use crossover_core::{
    AnnotatedRow, AnnotatedSeries, DateRange, EdgeKind, Error, Result, Series, WindowPair,
};
use tracing::{debug, warn};

/// Annotate `series` with SMAs over `window_a` and `window_b` and their
/// crossover markers.
///
/// The smaller window is always the fast average, whichever argument it
/// was passed in.
pub fn compute_signals(
    series: &Series,
    window_a: usize,
    window_b: usize,
) -> Result<AnnotatedSeries> {
    let windows = WindowPair::new(window_a, window_b)?;
    Ok(annotate(series, windows))
}

/// Annotate with an already validated window pair.
pub fn annotate(series: &Series, windows: WindowPair) -> AnnotatedSeries {
    if !series.is_empty() && windows.long() > series.len() {
        warn!(
            window = windows.long(),
            rows = series.len(),
            "Window longer than series, average will be undefined"
        );
    }

    let closes = series.closes();
    let avg_short = rolling_mean(&closes, windows.short());
    let avg_long = if windows.is_degenerate() {
        avg_short.clone()
    } else {
        rolling_mean(&closes, windows.long())
    };

    let states = trend_states(&avg_short, &avg_long);
    let edges = detect_edges(&states);

    let rows: Vec<AnnotatedRow> = series
        .records()
        .iter()
        .zip(avg_short)
        .zip(avg_long)
        .zip(edges)
        .map(|(((record, avg_short), avg_long), edge)| AnnotatedRow {
            record: record.clone(),
            avg_short,
            avg_long,
            sell_marker: (edge == Some(EdgeKind::Sell)).then_some(record.close),
            buy_marker: (edge == Some(EdgeKind::Buy)).then_some(record.close),
        })
        .collect();

    let annotated = AnnotatedSeries::new(windows, rows);
    debug!(
        short = windows.short(),
        long = windows.long(),
        rows = annotated.len(),
        edges = annotated.edges().len(),
        "Computed crossover signals"
    );
    annotated
}

/// Rows whose date lies within `range`, inclusive, in their original order.
///
/// Markers are not recomputed, so this must run after [`compute_signals`]
/// on the full series.
pub fn filter_by_date_range(annotated: &AnnotatedSeries, range: &DateRange) -> AnnotatedSeries {
    annotated.retain_rows(|row| range.contains(row.date()))
}

/// Engine that remembers the windows it last computed with.
///
/// A date-range-only change can then be served by [`CrossoverEngine::refresh`]
/// without asking the caller for the windows again.
#[derive(Debug, Clone, Default)]
pub struct CrossoverEngine {
    windows: Option<WindowPair>,
}

impl CrossoverEngine {
    /// Create an engine with no windows chosen yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a window pair already chosen.
    pub fn with_windows(windows: WindowPair) -> Self {
        Self {
            windows: Some(windows),
        }
    }

    /// Windows last used, if any.
    pub fn windows(&self) -> Option<WindowPair> {
        self.windows
    }

    /// Validate and remember the windows, then annotate the series.
    ///
    /// Invalid windows leave the remembered pair unchanged.
    pub fn compute(
        &mut self,
        series: &Series,
        window_a: usize,
        window_b: usize,
    ) -> Result<AnnotatedSeries> {
        let windows = WindowPair::new(window_a, window_b)?;
        self.windows = Some(windows);
        Ok(annotate(series, windows))
    }

    /// Recompute with the remembered windows, then apply `range`.
    pub fn refresh(&self, series: &Series, range: Option<&DateRange>) -> Result<AnnotatedSeries> {
        let windows = self
            .windows
            .ok_or_else(|| Error::invalid_window("no window lengths have been set"))?;
        let annotated = annotate(series, windows);
        Ok(match range {
            Some(range) => filter_by_date_range(&annotated, range),
            None => annotated,
        })
    }
}
