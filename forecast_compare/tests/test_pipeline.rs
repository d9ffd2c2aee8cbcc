use chrono::{Datelike, Days, NaiveDate};
use forecast_compare::{
    make_forecast, run_forecast, Figure, ForecastConfig, ForecastError, MethodSet, TimeSeries,
};
use rstest::rstest;

fn sine_series(days: u64) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..days).map(|i| start + Days::new(i)).collect();
    let values = dates
        .iter()
        .map(|d| 100.0 + 10.0 * (d.ordinal() as f64).sin())
        .collect();
    TimeSeries::new(dates, values).unwrap()
}

fn fast_config(horizon: usize) -> ForecastConfig {
    let mut config = ForecastConfig::new(horizon);
    config.seasonal.uncertainty_samples = 100;
    config.seasonal.seed = Some(7);
    config.boosted_trees.n_estimators = 100;
    config
}

#[test]
fn test_make_forecast_returns_three_charts() {
    let series = sine_series(400);
    let (seasonal, trees, comparison) = make_forecast(&series, 30).unwrap();

    assert_eq!(seasonal.trace("Predicted").unwrap().len(), 430);
    let predicted = trees.trace("Predicted").unwrap();
    assert_eq!(predicted.len(), 430);
    assert!(predicted.y.iter().all(|v| v.is_finite() && *v >= 50.0 && *v <= 150.0));

    assert_eq!(comparison.data.len(), 3);
    assert_eq!(comparison.vlines().len(), 1);
}

#[test]
fn test_input_series_is_untouched() {
    let series = sine_series(60);
    let before = series.clone();
    run_forecast(&series, &fast_config(10)).unwrap();

    assert_eq!(series, before);
}

#[test]
fn test_single_point_fails() {
    let series = TimeSeries::new(vec!["2023-05-01".parse().unwrap()], vec![10.0]).unwrap();
    let result = make_forecast(&series, 30);

    assert!(matches!(
        result,
        Err(ForecastError::FitError(_)) | Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_zero_horizon_fails() {
    let result = make_forecast(&sine_series(60), 0);
    assert!(matches!(result, Err(ForecastError::ConfigError(_))));
}

#[test]
fn test_duplicate_dates_fail_before_forecasting() {
    let date: NaiveDate = "2023-05-01".parse().unwrap();
    let result = TimeSeries::new(vec![date, date + Days::new(1), date], vec![1.0, 2.0, 3.0]);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[rstest]
#[case(MethodSet::both(), true, true, true)]
#[case(MethodSet::seasonal_only(), true, false, false)]
#[case(MethodSet::boosted_trees_only(), false, true, false)]
fn test_method_selection(
    #[case] methods: MethodSet,
    #[case] seasonal: bool,
    #[case] trees: bool,
    #[case] comparison: bool,
) {
    let config = fast_config(14).with_methods(methods);
    let charts = run_forecast(&sine_series(90), &config).unwrap();

    assert_eq!(charts.seasonal.is_some(), seasonal);
    assert_eq!(charts.boosted_trees.is_some(), trees);
    assert_eq!(charts.comparison.is_some(), comparison);
}

#[test]
fn test_empty_method_set_is_rejected() {
    let config = fast_config(14).with_methods(MethodSet {
        seasonal: false,
        boosted_trees: false,
    });
    let result = run_forecast(&sine_series(30), &config);

    assert!(matches!(result, Err(ForecastError::ConfigError(_))));
}

#[test]
fn test_charts_serialize() {
    let charts = run_forecast(&sine_series(45), &fast_config(7)).unwrap();
    let json = serde_json::to_value(&charts).unwrap();

    assert!(json["comparison"]["layout"]["shapes"].is_array());
    assert_eq!(json["seasonal"]["layout"]["width"], 900);
}

fn trace_shapes(figure: &Figure) -> Vec<(String, usize)> {
    figure.data.iter().map(|t| (t.name.clone(), t.len())).collect()
}

#[test]
fn test_make_forecast_matches_default_run() {
    let series = sine_series(60);
    let (seasonal, trees, comparison) = make_forecast(&series, 10).unwrap();
    let charts = run_forecast(&series, &ForecastConfig::new(10)).unwrap();

    assert_eq!(trace_shapes(&seasonal), trace_shapes(&charts.seasonal.unwrap()));
    assert_eq!(trace_shapes(&trees), trace_shapes(&charts.boosted_trees.unwrap()));
    let expected = charts.comparison.unwrap();
    assert_eq!(trace_shapes(&comparison), trace_shapes(&expected));
    assert_eq!(comparison.vlines(), expected.vlines());
}
