//! Data ingestion and normalization for the crossover analyzer.
//!
//! This crate handles:
//! - Reading raw OHLCV rows from delimited files
//! - Date and numeric field validation
//! - Normalization into an ordered, de-duplicated series

pub mod csv_source;
pub mod loader;

pub use csv_source::{load_series_from_path, read_raw_records, read_raw_records_from_path};
pub use loader::{load_series, load_series_with_stats, parse_date, LoadStats};
