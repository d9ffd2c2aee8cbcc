//! Forecasting models for daily time series

use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;

/// Forecast result: one predicted value per date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Dates the predictions refer to
    pub(crate) dates: Vec<NaiveDate>,
    /// Predicted values
    pub(crate) values: Vec<f64>,
    /// Uncertainty intervals (optional)
    pub(crate) intervals: Option<Vec<(f64, f64)>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if values.len() != dates.len() {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match dates length ({})",
                values.len(),
                dates.len()
            )));
        }

        Ok(Self {
            dates,
            values,
            intervals: None,
        })
    }

    /// Create a new forecast result with uncertainty intervals
    pub fn new_with_intervals(
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if values.len() != intervals.len() {
            return Err(ForecastError::DataError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                values.len(),
                intervals.len()
            )));
        }

        let mut result = Self::new(dates, values)?;
        result.intervals = Some(intervals);
        Ok(result)
    }

    /// Get the dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the predicted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the uncertainty intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Trailing `n` points, or all of them when fewer exist
    pub fn tail(&self, n: usize) -> Self {
        let start = self.values.len().saturating_sub(n);
        Self {
            dates: self.dates[start..].to_vec(),
            values: self.values[start..].to_vec(),
            intervals: self.intervals.as_ref().map(|i| i[start..].to_vec()),
        }
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict values for arbitrary dates (history or future)
    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a daily series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the series
    fn train(&self, series: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod boosted_trees;
pub(crate) mod ridge;
pub mod seasonal;
