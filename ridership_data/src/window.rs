//! Training windows: which part of the history the models see

use crate::error::{DataLoadError, Result};
use chrono::{Days, NaiveDate};
use forecast_compare::TimeSeries;
use serde::{Deserialize, Serialize};

/// Portion of a series used for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingWindow {
    /// The full history
    #[default]
    All,
    /// The last `n` calendar days, ending at the last observation
    LastDays(u64),
    /// Inclusive date range
    Range { start: NaiveDate, end: NaiveDate },
}

impl TrainingWindow {
    /// Trim `series` to this window
    pub fn apply(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let (start, end) = match *self {
            TrainingWindow::All => return Ok(series.clone()),
            TrainingWindow::LastDays(0) => {
                return Err(DataLoadError::EmptyWindow(
                    "a window of 0 days holds no observations".to_string(),
                ))
            }
            TrainingWindow::LastDays(days) => {
                let end = series.last_date();
                let start = end
                    .checked_sub_days(Days::new(days - 1))
                    .unwrap_or(NaiveDate::MIN);
                (start, end)
            }
            TrainingWindow::Range { start, end } => (start, end),
        };

        let observations: Vec<_> = series
            .observations()
            .iter()
            .filter(|o| o.date >= start && o.date <= end)
            .copied()
            .collect();

        if observations.is_empty() {
            return Err(DataLoadError::EmptyWindow(format!(
                "no observations between {} and {}",
                start, end
            )));
        }

        Ok(TimeSeries::from_observations(observations)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let dates = (0..10).map(|i| start + Days::new(i)).collect();
        TimeSeries::new(dates, (0..10).map(|i| i as f64).collect()).unwrap()
    }

    #[test]
    fn test_all_keeps_everything() {
        assert_eq!(TrainingWindow::All.apply(&series()).unwrap(), series());
    }

    #[test]
    fn test_last_days() {
        let trimmed = TrainingWindow::LastDays(3).apply(&series()).unwrap();
        assert_eq!(trimmed.values(), vec![7.0, 8.0, 9.0]);

        let everything = TrainingWindow::LastDays(1000).apply(&series()).unwrap();
        assert_eq!(everything.len(), 10);
    }

    #[test]
    fn test_empty_windows() {
        assert!(matches!(
            TrainingWindow::LastDays(0).apply(&series()),
            Err(DataLoadError::EmptyWindow(_))
        ));

        let window = TrainingWindow::Range {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert!(matches!(window.apply(&series()), Err(DataLoadError::EmptyWindow(_))));
    }
}
