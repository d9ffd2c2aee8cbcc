//! # Forecast Compare
//!
//! Forecast a daily series with two independent models and compare them on
//! one calendar.
//!
//! ## Features
//!
//! - Calendar feature construction (day of week, day of year, ISO week, month, year)
//! - Seasonal decomposition model with piecewise-linear trend, Fourier
//!   seasonality, US holidays and a simulated uncertainty band
//! - Gradient-boosted regression trees on calendar features
//! - Plotly-compatible charts, including a comparison of both forecasts
//!   around the end of the history
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::{Days, NaiveDate};
//! use forecast_compare::{make_forecast, TimeSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
//! let dates: Vec<NaiveDate> = (0..400).map(|i| start + Days::new(i)).collect();
//! let values: Vec<f64> = (0..400).map(|i| 100.0 + (i % 7) as f64).collect();
//! let series = TimeSeries::new(dates, values)?;
//!
//! let (_seasonal, _trees, comparison) = make_forecast(&series, 30)?;
//! std::fs::write("comparison.json", comparison.to_json()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod chart;
pub mod comparison;
pub mod config;
pub mod error;
pub mod features;
pub mod frame;
pub mod holidays;
pub mod models;
pub mod pipeline;
pub mod series;

// Re-export commonly used types
pub use crate::chart::Figure;
pub use crate::config::{BoostedTreesParams, ForecastConfig, MethodSet, SeasonalParams, SeasonalityMode};
pub use crate::error::{ForecastError, Result};
pub use crate::frame::FutureFrame;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{make_forecast, run_forecast, ForecastCharts};
pub use crate::series::{Observation, TimeSeries};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
