//! Error types for the ridership_data crate

use forecast_compare::ForecastError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures while reading ridership tables or selecting a series
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(String),

    /// A required column is absent from the table
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid value in column '{column}': {message}")]
    InvalidValue { column: String, message: String },

    /// Station or line name not present in the dataset
    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    #[error("Training window is empty: {0}")]
    EmptyWindow(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, DataLoadError>;

impl From<PolarsError> for DataLoadError {
    fn from(err: PolarsError) -> Self {
        DataLoadError::Polars(err.to_string())
    }
}

impl DataLoadError {
    pub(crate) fn invalid(column: &str, message: impl Into<String>) -> Self {
        DataLoadError::InvalidValue {
            column: column.to_string(),
            message: message.into(),
        }
    }
}
