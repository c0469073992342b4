//! Trend state and crossover edge detection.
//!
//! The trend state says whether the fast average is above the slow one.
//! An edge is a row whose state differs from the previous row's state;
//! rows where either state is undefined never produce an edge.

use crossover_core::EdgeKind;

/// Relative position of the fast average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum TrendState {
    /// Fast average strictly above slow average.
    Above = 1,
    /// Fast average below or equal to slow average.
    AtOrBelow = 0,
}

impl TrendState {
    /// Classify `fast - slow`. Equality counts as below.
    #[inline]
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            TrendState::Above
        } else {
            TrendState::AtOrBelow
        }
    }

    /// Get the state as i8.
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }
}

/// Trend state per row, None where either average is undefined.
pub fn trend_states(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<Option<TrendState>> {
    fast.iter()
        .zip(slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(TrendState::from_difference(f - s)),
            _ => None,
        })
        .collect()
}

/// Edge per row from the first difference of the state sequence.
///
/// -1 is a sell, +1 is a buy. The first row has no predecessor and an
/// undefined state on either side means no edge.
pub fn detect_edges(states: &[Option<TrendState>]) -> Vec<Option<EdgeKind>> {
    let mut edges = Vec::with_capacity(states.len());
    let mut prev: Option<TrendState> = None;

    for &state in states {
        let edge = match (prev, state) {
            (Some(p), Some(c)) => match c.value() - p.value() {
                -1 => Some(EdgeKind::Sell),
                1 => Some(EdgeKind::Buy),
                _ => None,
            },
            _ => None,
        };
        edges.push(edge);
        prev = state;
    }

    edges
}
