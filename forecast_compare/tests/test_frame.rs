use chrono::{Days, NaiveDate};
use forecast_compare::{make_forecast, ForecastError, FutureFrame, TimeSeries};
use pretty_assertions::assert_eq;

fn create_test_series(days: u64) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    let dates = (0..days).map(|i| start + Days::new(i)).collect();
    TimeSeries::new(dates, (0..days).map(|i| 10.0 + i as f64).collect()).unwrap()
}

#[test]
fn test_extend_appends_consecutive_days() {
    let series = create_test_series(30);
    let frame = FutureFrame::extend(&series, 5).unwrap();

    assert_eq!(frame.len(), 35);
    assert_eq!(frame.history_len(), 30);
    assert_eq!(frame.horizon(), 5);
    assert_eq!(frame.history_dates(), series.dates().as_slice());
    assert_eq!(
        frame.future_dates(),
        (1..=5)
            .map(|i| series.last_date() + Days::new(i))
            .collect::<Vec<_>>()
            .as_slice()
    );
}

#[test]
fn test_horizon_past_calendar_end() {
    let series = create_test_series(30);

    let result = FutureFrame::extend(&series, usize::MAX / 2);
    assert!(matches!(result, Err(ForecastError::DataError(_))));

    let result = make_forecast(&series, usize::MAX / 2);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_zero_horizon() {
    let result = FutureFrame::extend(&create_test_series(10), 0);
    assert!(matches!(result, Err(ForecastError::ConfigError(_))));
}
