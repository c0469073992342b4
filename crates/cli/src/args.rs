//! Command-line arguments and user input parsing.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use crossover_core::{Config, DateRange};
use std::path::PathBuf;

/// SMA crossover analysis of a daily OHLCV file.
#[derive(Parser, Debug)]
#[command(name = "crossover", version, about)]
pub struct Args {
    /// CSV file with a date index column and Close/Volume columns.
    #[arg(short, long)]
    pub input: PathBuf,

    /// First SMA window in trading days.
    #[arg(short = 'a', long)]
    pub window_a: Option<usize>,

    /// Second SMA window in trading days.
    #[arg(short = 'b', long)]
    pub window_b: Option<usize>,

    /// First date to show (DD/MM/YYYY or YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Last date to show (DD/MM/YYYY or YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,

    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Field delimiter, overrides the configuration.
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// How the annotated series is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text columns.
    Table,
    /// Annotated series as JSON.
    Json,
    /// One line per crossover.
    Edges,
}

impl Args {
    /// Override configuration values with the ones given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(window) = self.window_a {
            config.signal.window_a = window;
        }
        if let Some(window) = self.window_b {
            config.signal.window_b = window;
        }
        if let Some(delimiter) = self.delimiter {
            config.input.delimiter = delimiter;
        }
    }
}

/// Parse a user-entered date in `format`, falling back to ISO.
pub fn parse_user_date(text: &str, format: &str) -> Result<NaiveDate> {
    let text = text.trim();
    for fmt in [format, "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Ok(date);
        }
    }
    bail!("cannot parse date {:?} (expected {} or YYYY-MM-DD)", text, format)
}

/// Build the display range; a missing bound is taken from the loaded series.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    full: Option<DateRange>,
) -> Option<DateRange> {
    if start.is_none() && end.is_none() {
        return None;
    }
    let full = full?;
    Some(DateRange::new(
        start.unwrap_or(full.start),
        end.unwrap_or(full.end),
    ))
}
