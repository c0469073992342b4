//! Moving-average crossover signals.
//!
//! This crate handles:
//! - Trailing simple moving averages of close
//! - Trend state and crossover edge detection
//! - Annotating a series with buy/sell markers
//! - Inclusive date-range filtering
//! - Load/update session state for interactive callers

pub mod rolling;
pub mod crossover;
pub mod engine;
pub mod session;

pub use rolling::{rolling_mean, round_half_even, RollingMean};
pub use crossover::{detect_edges, trend_states, TrendState};
pub use engine::{compute_signals, filter_by_date_range, CrossoverEngine};
pub use session::ChartSession;
