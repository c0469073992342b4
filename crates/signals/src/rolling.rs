//! Trailing simple moving average.
//!
//! Keeps a bounded window of the most recent values and a compensated
//! running sum, so each update is O(1) and long series do not drift.

use std::collections::VecDeque;

/// Round to `decimals` places, ties to even.
#[inline]
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Rolling mean over the last `window` observations.
pub struct RollingMean {
    /// Window size in observations.
    window: usize,
    /// Values currently in the window.
    values: VecDeque<f64>,
    /// Running sum of `values`.
    sum: f64,
    /// Kahan compensation term for `sum`.
    compensation: f64,
}

impl RollingMean {
    /// Create a new rolling mean. A zero window never becomes ready.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window.min(4096)),
            sum: 0.0,
            compensation: 0.0,
        }
    }

    /// Add an observation.
    ///
    /// Returns the current mean once the window is full.
    pub fn add(&mut self, value: f64) -> Option<f64> {
        if self.window == 0 {
            return None;
        }

        // If window is full, remove oldest
        if self.values.len() >= self.window {
            if let Some(old) = self.values.pop_front() {
                self.accumulate(-old);
            }
        }

        self.values.push_back(value);
        self.accumulate(value);
        self.mean()
    }

    fn accumulate(&mut self, x: f64) {
        let y = x - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// Mean of the window, or None until it holds `window` values.
    pub fn mean(&self) -> Option<f64> {
        if self.is_ready() {
            Some(self.sum / self.window as f64)
        } else {
            None
        }
    }

    /// Check if the window is full.
    pub fn is_ready(&self) -> bool {
        self.window > 0 && self.values.len() >= self.window
    }

    /// Get the number of observations in the window.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Clear all data.
    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
        self.compensation = 0.0;
    }
}

/// Trailing mean of `values` at every position, rounded to 3 decimals.
///
/// Positions before the first full window are None.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut mean = RollingMean::new(window);
    values
        .iter()
        .map(|&v| mean.add(v).map(|m| round_half_even(m, 3)))
        .collect()
}
