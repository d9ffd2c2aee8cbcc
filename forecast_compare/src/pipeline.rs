//! Forecast pipeline: seasonal model, tree model, comparison

use crate::chart::Figure;
use crate::comparison::compare_forecasts;
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::frame::FutureFrame;
use crate::models::boosted_trees::forecast_boosted_trees;
use crate::models::seasonal::forecast_seasonal;
use crate::series::TimeSeries;
use serde::Serialize;
use tracing::{debug, info_span};

/// Charts produced by one pipeline run.
///
/// A chart is absent when its method was not selected; the comparison
/// needs both methods.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastCharts {
    pub seasonal: Option<Figure>,
    pub boosted_trees: Option<Figure>,
    pub comparison: Option<Figure>,
}

/// Run both models with default parameters and compare them.
///
/// Returns the seasonal, tree and comparison charts, in that order.
pub fn make_forecast(series: &TimeSeries, horizon_days: usize) -> Result<(Figure, Figure, Figure)> {
    let charts = run_forecast(series, &ForecastConfig::new(horizon_days))?;

    match (charts.seasonal, charts.boosted_trees, charts.comparison) {
        (Some(seasonal), Some(trees), Some(comparison)) => Ok((seasonal, trees, comparison)),
        _ => Err(ForecastError::FitError(
            "Pipeline did not produce all three charts".to_string(),
        )),
    }
}

/// Run the methods selected in `config`.
///
/// Every model receives its own copy of the series. When the seasonal
/// model is skipped, the future frame is built directly from the series.
pub fn run_forecast(series: &TimeSeries, config: &ForecastConfig) -> Result<ForecastCharts> {
    config.validate()?;
    let horizon = config.horizon_days;
    let _span = info_span!("run_forecast", rows = series.len(), horizon).entered();

    let (seasonal, frame) = if config.methods.seasonal {
        let output = forecast_seasonal(series.clone(), horizon, &config.seasonal)?;
        debug!(points = output.forecast.len(), "seasonal forecast done");
        (Some((output.chart, output.forecast)), output.frame)
    } else {
        (None, FutureFrame::extend(series, horizon)?)
    };

    let trees = if config.methods.boosted_trees {
        let output = forecast_boosted_trees(series.clone(), &frame, &config.boosted_trees)?;
        debug!(points = output.forecast.len(), "tree forecast done");
        Some((output.chart, output.forecast))
    } else {
        None
    };

    let comparison = match (&seasonal, &trees) {
        (Some((_, seasonal_forecast)), Some((_, tree_forecast))) => Some(compare_forecasts(
            series,
            seasonal_forecast,
            tree_forecast,
            horizon,
        )?),
        _ => None,
    };

    Ok(ForecastCharts {
        seasonal: seasonal.map(|(chart, _)| chart),
        boosted_trees: trees.map(|(chart, _)| chart),
        comparison,
    })
}
