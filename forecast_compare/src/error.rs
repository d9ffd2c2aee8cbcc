//! Error types for the forecast_compare crate

use thiserror::Error;

/// Custom error types for the forecast_compare crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed or insufficient input data
    #[error("Data error: {0}")]
    DataError(String),

    /// A model could not be trained or evaluated
    #[error("Fit error: {0}")]
    FitError(String),

    /// Invalid horizon, method set or model parameter
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Chart encoding failed
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<smartcore::error::Failed> for ForecastError {
    fn from(err: smartcore::error::Failed) -> Self {
        ForecastError::FitError(err.to_string())
    }
}
