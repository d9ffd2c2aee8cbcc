//! # Metro Forecast
//!
//! Forecast daily metro ridership with a seasonal model and with boosted
//! regression trees, and compare both on one chart.
//!
//! A [`DashboardRequest`] names the series (total, one station or one
//! line), the training window and the forecast configuration.
//!
//! ```no_run
//! use metro_forecast::{DashboardRequest, DatasetSelection};
//! use ridership_data::RidershipDataset;
//!
//! let dataset = RidershipDataset::load("data")?;
//! let request = DashboardRequest::new(DatasetSelection::Station("59 ST".to_string()), 90);
//! let charts = request.run(&dataset)?;
//! assert!(charts.comparison.is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use forecast_compare::{run_forecast, ForecastCharts, ForecastConfig, ForecastError};
use ridership_data::{DataLoadError, RidershipDataset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub use forecast_compare::MethodSet;
pub use ridership_data::{DatasetSelection, TrainingWindow};

/// Horizons offered by the dashboard, in days
pub const HORIZON_CHOICES: [usize; 4] = [30, 90, 180, 365];

/// Errors from a dashboard run
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Invalid request: {0}")]
    Request(#[from] serde_json::Error),
}

/// One dashboard interaction: which series, how much history, which forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub dataset: DatasetSelection,
    #[serde(default)]
    pub window: TrainingWindow,
    pub forecast: ForecastConfig,
}

impl DashboardRequest {
    /// Default forecast configuration over the full history
    pub fn new(dataset: DatasetSelection, horizon_days: usize) -> Self {
        Self {
            dataset,
            window: TrainingWindow::All,
            forecast: ForecastConfig::new(horizon_days),
        }
    }

    pub fn with_window(mut self, window: TrainingWindow) -> Self {
        self.window = window;
        self
    }

    /// Parse a request from JSON
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Select the series, trim it to the window and run the forecasts
    pub fn run(&self, dataset: &RidershipDataset) -> Result<ForecastCharts, DashboardError> {
        self.forecast.validate()?;

        let series = dataset.series(&self.dataset)?;
        let series = self.window.apply(&series)?;
        info!(
            selection = ?self.dataset,
            rows = series.len(),
            first = %series.first_date(),
            last = %series.last_date(),
            horizon = self.forecast.horizon_days,
            "running forecast"
        );

        Ok(run_forecast(&series, &self.forecast)?)
    }
}
