//! Error types for the crossover analyzer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crossover analyzer.
#[derive(Error, Debug)]
pub enum Error {
    /// Input record could not be parsed (bad date, missing or non-numeric field).
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Window length is not a positive integer, or no window has been chosen yet.
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// No series has been loaded into the session.
    #[error("No series loaded: {0}")]
    NotLoaded(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed input error.
    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// Create an invalid window error.
    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Error::InvalidWindow(msg.into())
    }

    /// Create a not-loaded error.
    pub fn not_loaded(msg: impl Into<String>) -> Self {
        Error::NotLoaded(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
