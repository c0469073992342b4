//! Core types and configuration for the crossover analyzer.
//!
//! This crate provides shared types used across all other crates:
//! - Price records, series and annotated series
//! - Date ranges and window pairs
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
