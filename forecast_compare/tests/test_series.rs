use chrono::NaiveDate;
use forecast_compare::series::{Observation, TimeSeries};
use forecast_compare::ForecastError;
use pretty_assertions::assert_eq;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_series_is_sorted_on_construction() {
    let dates = vec![date("2023-01-03"), date("2023-01-01"), date("2023-01-02")];
    let series = TimeSeries::new(dates, vec![3.0, 1.0, 2.0]).unwrap();

    assert_eq!(
        series.dates(),
        vec![date("2023-01-01"), date("2023-01-02"), date("2023-01-03")]
    );
    assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    assert_eq!(series.first_date(), date("2023-01-01"));
    assert_eq!(series.last_date(), date("2023-01-03"));
}

#[test]
fn test_duplicate_timestamp_is_rejected() {
    let dates = vec![date("2023-01-01"), date("2023-01-02"), date("2023-01-01")];
    let result = TimeSeries::new(dates, vec![1.0, 2.0, 3.0]);

    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    for bad in [f64::NAN, f64::INFINITY, -1.0] {
        let result = TimeSeries::new(vec![date("2023-01-01"), date("2023-01-02")], vec![1.0, bad]);
        assert!(matches!(result, Err(ForecastError::DataError(_))), "{bad} accepted");
    }
}

#[test]
fn test_empty_and_mismatched_input() {
    assert!(matches!(
        TimeSeries::new(Vec::new(), Vec::new()),
        Err(ForecastError::DataError(_))
    ));
    assert!(matches!(
        TimeSeries::new(vec![date("2023-01-01")], vec![1.0, 2.0]),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_tail_and_between() {
    let observations: Vec<Observation> = (1..=10)
        .map(|d| Observation::new(NaiveDate::from_ymd_opt(2023, 1, d).unwrap(), d as f64))
        .collect();
    let series = TimeSeries::from_observations(observations).unwrap();

    assert_eq!(series.tail(3).len(), 3);
    assert_eq!(series.tail(3)[0].value, 8.0);
    // Asking for more than exists returns everything
    assert_eq!(series.tail(50).len(), 10);

    let window = series.between(date("2023-01-04"), date("2023-01-06")).unwrap();
    assert_eq!(window.values(), vec![4.0, 5.0, 6.0]);

    let outside = series.between(date("2024-01-01"), date("2024-02-01"));
    assert!(outside.is_err());
}
