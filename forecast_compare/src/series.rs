//! Daily time series input

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day of the observation
    pub date: NaiveDate,
    /// Observed value (ridership count)
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Validated daily series: unique dates in chronological order,
/// finite non-negative values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Create a new series from parallel date and value vectors
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        let observations = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| Observation::new(date, value))
            .collect();

        Self::from_observations(observations)
    }

    /// Create a new series from observations in any order.
    ///
    /// Observations are sorted by date. Empty input, repeated dates and
    /// values that are negative or not finite are rejected.
    pub fn from_observations(mut observations: Vec<Observation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForecastError::DataError(
                "Empty time series data".to_string(),
            ));
        }

        if let Some(bad) = observations
            .iter()
            .find(|o| !o.value.is_finite() || o.value < 0.0)
        {
            return Err(ForecastError::DataError(format!(
                "Invalid value {} on {}: values must be finite and non-negative",
                bad.value, bad.date
            )));
        }

        observations.sort_by_key(|o| o.date);

        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ForecastError::DataError(format!(
                "Duplicate timestamp {}",
                pair[0].date
            )));
        }

        Ok(Self { observations })
    }

    /// Get the observations
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Get the dates as a vector
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// Get the values as a vector
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// First observed date
    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    /// Last observed date
    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false: an empty series cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Trailing `n` observations, or all of them when fewer exist
    pub fn tail(&self, n: usize) -> &[Observation] {
        let start = self.observations.len().saturating_sub(n);
        &self.observations[start..]
    }

    /// Observations with `start <= date <= end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let observations: Vec<Observation> = self
            .observations
            .iter()
            .filter(|o| o.date >= start && o.date <= end)
            .copied()
            .collect();

        Self::from_observations(observations)
    }
}
