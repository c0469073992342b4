//! Configuration structures for the crossover analyzer.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Moving average windows.
    pub signal: SignalConfig,
    /// Input file configuration.
    pub input: InputConfig,
    /// Output formatting configuration.
    pub display: DisplayConfig,
}

impl Config {
    /// Parse a configuration from a JSON string. Missing sections take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.signal.window_a == 0 || self.signal.window_b == 0 {
            return Err(Error::invalid_window(format!(
                "configured windows must be positive, got {} and {}",
                self.signal.window_a, self.signal.window_b
            )));
        }
        if !self.input.delimiter.is_ascii() {
            return Err(Error::config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.input.delimiter
            )));
        }
        Ok(())
    }
}

/// Moving average window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// First SMA window in trading days.
    pub window_a: usize,
    /// Second SMA window in trading days.
    pub window_b: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window_a: 20,
            window_b: 50,
        }
    }
}

/// Delimited input configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field delimiter.
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// chrono format used for user-entered range bounds (e.g. "%d/%m/%Y").
    pub input_date_format: String,
    /// Decimal places printed for prices and averages.
    pub precision: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            input_date_format: "%d/%m/%Y".to_string(),
            precision: 3,
        }
    }
}
