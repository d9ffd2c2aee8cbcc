//! Future frame: the historical calendar extended past the last observation

use crate::config::validate_horizon;
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use chrono::{Days, NaiveDate};

/// Historical dates followed by `horizon` consecutive future days.
///
/// Both models predict on the same frame, which keeps their outputs
/// aligned on one calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FutureFrame {
    dates: Vec<NaiveDate>,
    history_len: usize,
}

impl FutureFrame {
    /// Extend the dates of `series` by `horizon` days
    pub fn extend(series: &TimeSeries, horizon: usize) -> Result<Self> {
        validate_horizon(horizon)?;

        let last = series.last_date();
        if last.checked_add_days(Days::new(horizon as u64)).is_none() {
            return Err(ForecastError::DataError(format!(
                "Date {} plus {} days is out of range",
                last, horizon
            )));
        }

        let mut dates = series.dates();
        dates.reserve(horizon);
        dates.extend((1..=horizon as u64).map(|step| last + Days::new(step)));

        Ok(Self {
            dates,
            history_len: series.len(),
        })
    }

    /// All dates, history first
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Historical part of the frame
    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.dates[..self.history_len]
    }

    /// Dates after the last observation
    pub fn future_dates(&self) -> &[NaiveDate] {
        &self.dates[self.history_len..]
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn horizon(&self) -> usize {
        self.dates.len() - self.history_len
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
