/// Error types for the forecast pipeline
use thiserror::Error;

/// Main error type for forecast operations
#[derive(Error, Debug)]
pub enum ForecastError {
    /// Input that no sensible result can be computed from
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream service answered with a non-success status
    #[error("{service} returned status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    /// Failed to parse HTTP response
    #[error("Failed to parse HTTP response: {0}")]
    ResponseParse(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Resort not found
    #[error("Resort not found: {0}")]
    ResortNotFound(String),
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
