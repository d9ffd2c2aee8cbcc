//! Side-by-side view of both forecasts around the end of the history

use crate::chart::{Figure, Layout, Trace, ACTUAL_COLOR, BOUNDARY_COLOR, SEASONAL_COLOR, TREES_COLOR};
use crate::config::validate_horizon;
use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use crate::series::TimeSeries;
use chrono::NaiveTime;

/// Render the trailing `2 * horizon` points of both forecasts against the
/// trailing `horizon` observations.
///
/// When fewer points exist, every available point is used. The dashed
/// boundary marker sits at noon of the last observed day, between the last
/// observation and the first forecast day.
pub fn compare_forecasts(
    series: &TimeSeries,
    seasonal: &ForecastResult,
    trees: &ForecastResult,
    horizon: usize,
) -> Result<Figure> {
    validate_horizon(horizon)?;

    let window = horizon.saturating_mul(2);
    let seasonal = seasonal.tail(window);
    let trees = trees.tail(window);

    if seasonal.dates() != trees.dates() {
        return Err(ForecastError::DataError(
            "Seasonal and tree forecasts are not aligned on the same dates".to_string(),
        ));
    }
    if seasonal.is_empty() {
        return Err(ForecastError::DataError(
            "Nothing to compare: forecasts are empty".to_string(),
        ));
    }

    let actual = series.tail(horizon);
    let data = vec![
        Trace::markers(
            "Actual",
            actual.iter().map(|o| o.date).collect(),
            actual.iter().map(|o| o.value).collect(),
            ACTUAL_COLOR,
        ),
        Trace::line(
            "Seasonal",
            seasonal.dates().to_vec(),
            seasonal.values().to_vec(),
            SEASONAL_COLOR,
        ),
        Trace::line(
            "Boosted trees",
            trees.dates().to_vec(),
            trees.values().to_vec(),
            TREES_COLOR,
        ),
    ];

    let mut figure = Figure::new(data, Layout::time_series(true));
    let boundary = series.last_date().and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    figure.add_vline(boundary, BOUNDARY_COLOR);

    Ok(figure)
}
