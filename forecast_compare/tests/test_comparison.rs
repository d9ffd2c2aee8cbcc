use chrono::{Days, NaiveDate};
use forecast_compare::comparison::compare_forecasts;
use forecast_compare::{ForecastError, ForecastResult, FutureFrame, TimeSeries};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn create_test_series(days: u64) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..days).map(|i| start + Days::new(i)).collect();
    let values = (0..days).map(|i| 50.0 + i as f64).collect();
    TimeSeries::new(dates, values).unwrap()
}

fn flat_forecast(frame: &FutureFrame, value: f64) -> ForecastResult {
    ForecastResult::new(frame.dates().to_vec(), vec![value; frame.len()]).unwrap()
}

#[rstest]
#[case(100, 7)]
#[case(100, 30)]
#[case(10, 1)]
fn test_window_shapes(#[case] days: u64, #[case] horizon: usize) {
    let series = create_test_series(days);
    let frame = FutureFrame::extend(&series, horizon).unwrap();
    let figure = compare_forecasts(
        &series,
        &flat_forecast(&frame, 1.0),
        &flat_forecast(&frame, 2.0),
        horizon,
    )
    .unwrap();

    let actual = figure.trace("Actual").unwrap();
    let seasonal = figure.trace("Seasonal").unwrap();
    let trees = figure.trace("Boosted trees").unwrap();

    assert_eq!(actual.len(), horizon);
    assert_eq!(seasonal.len(), 2 * horizon);
    assert_eq!(seasonal.x, trees.x);
    assert_eq!(seasonal.x, frame.dates()[frame.len() - 2 * horizon..].to_vec());
    // Ground truth sits in the first half of the window
    assert_eq!(actual.x[..], seasonal.x[..horizon]);
    assert!(figure.layout.showlegend);
}

#[rstest]
#[case(100, 30)]
#[case(10, 1)]
#[case(5, 20)]
fn test_boundary_marker_inside_window(#[case] days: u64, #[case] horizon: usize) {
    let series = create_test_series(days);
    let frame = FutureFrame::extend(&series, horizon).unwrap();
    let figure = compare_forecasts(
        &series,
        &flat_forecast(&frame, 1.0),
        &flat_forecast(&frame, 2.0),
        horizon,
    )
    .unwrap();

    let vlines = figure.vlines();
    assert_eq!(vlines.len(), 1);
    let x = figure.trace("Seasonal").unwrap().x.clone();
    let start = x[0].and_hms_opt(0, 0, 0).unwrap();
    let end = x[x.len() - 1].and_hms_opt(0, 0, 0).unwrap();
    assert!(vlines[0] > start && vlines[0] < end);
}

#[test]
fn test_short_history_is_truncated_silently() {
    // 5 observations, horizon 20: window wants 40 points, only 25 exist
    let series = create_test_series(5);
    let frame = FutureFrame::extend(&series, 20).unwrap();
    let figure = compare_forecasts(
        &series,
        &flat_forecast(&frame, 1.0),
        &flat_forecast(&frame, 2.0),
        20,
    )
    .unwrap();

    assert_eq!(figure.trace("Seasonal").unwrap().len(), 25);
    assert_eq!(figure.trace("Boosted trees").unwrap().len(), 25);
    assert_eq!(figure.trace("Actual").unwrap().len(), 5);
}

#[test]
fn test_misaligned_forecasts() {
    let series = create_test_series(30);
    let frame = FutureFrame::extend(&series, 5).unwrap();
    let shifted: Vec<NaiveDate> = frame.dates().iter().map(|d| *d + Days::new(1)).collect();
    let other = ForecastResult::new(shifted, vec![1.0; frame.len()]).unwrap();

    let result = compare_forecasts(&series, &flat_forecast(&frame, 1.0), &other, 5);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_zero_horizon() {
    let series = create_test_series(30);
    let frame = FutureFrame::extend(&series, 5).unwrap();
    let forecast = flat_forecast(&frame, 1.0);

    let result = compare_forecasts(&series, &forecast, &forecast, 0);
    assert!(matches!(result, Err(ForecastError::ConfigError(_))));
}
