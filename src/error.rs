//! Error types for the study timer library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Camera could not be opened or permission was denied
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// Landmark model failed to load
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// A single detection request failed; the sample is treated as absent
    #[error("Detection error: {0}")]
    Detection(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Replay trace could not be parsed or is inconsistent
    #[error("Trace error: {0}")]
    Trace(String),
}

impl Error {
    /// Whether the error ends the monitoring function instead of a single sample
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SensorUnavailable(_) | Self::ModelLoad(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
