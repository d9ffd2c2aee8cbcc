//! Calendar features derived from a date index

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Feature column names, in the order produced by [`FeatureRow::to_vec`]
pub const FEATURE_NAMES: [&str; 5] = ["dayofweek", "dayofyear", "week", "month", "year"];

/// Calendar features of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRow {
    /// Day of week, Monday = 0 ... Sunday = 6
    pub day_of_week: u32,
    /// Day of year, 1 ..= 366
    pub day_of_year: u32,
    /// ISO 8601 week number
    pub week: u32,
    /// Month, 1 ..= 12
    pub month: u32,
    /// Calendar year
    pub year: i32,
}

impl FeatureRow {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day_of_week: date.weekday().num_days_from_monday(),
            day_of_year: date.ordinal(),
            week: date.iso_week().week(),
            month: date.month(),
            year: date.year(),
        }
    }

    /// Numeric form used as a model input row
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.day_of_week as f64,
            self.day_of_year as f64,
            self.week as f64,
            self.month as f64,
            self.year as f64,
        ]
    }
}

/// A date-indexed frame augmented with calendar features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    /// Date index
    pub index: Vec<NaiveDate>,
    /// Value column, absent for frames that only carry future dates
    pub values: Option<Vec<f64>>,
    /// One feature row per index entry
    pub rows: Vec<FeatureRow>,
}

impl FeatureFrame {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Feature rows as a row-major matrix
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(FeatureRow::to_vec).collect()
    }
}

/// Build calendar features for `index`.
///
/// Returns the augmented frame and the feature column names. The same
/// function must be used for the training history and for the future
/// frame so both share one feature domain.
pub fn create_features(
    index: &[NaiveDate],
    values: Option<&[f64]>,
) -> Result<(FeatureFrame, Vec<String>)> {
    if let Some(values) = values {
        if values.len() != index.len() {
            return Err(ForecastError::DataError(format!(
                "Index length ({}) doesn't match values length ({})",
                index.len(),
                values.len()
            )));
        }
    }

    let rows = index.iter().map(|d| FeatureRow::from_date(*d)).collect();
    let frame = FeatureFrame {
        index: index.to_vec(),
        values: values.map(|v| v.to_vec()),
        rows,
    };
    let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();

    Ok((frame, names))
}
