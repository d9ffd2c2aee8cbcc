//! Forecast configuration: horizon, selected methods and model parameters

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Number of boosting rounds
pub const DEFAULT_N_ESTIMATORS: usize = 500;
/// Shrinkage applied to every tree
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

/// How seasonal and holiday effects combine with the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalityMode {
    Additive,
    Multiplicative,
}

/// Parameters of the seasonal decomposition model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalParams {
    pub seasonality_mode: SeasonalityMode,
    /// Maximum number of trend changepoints
    pub n_changepoints: usize,
    /// Share of the history in which changepoints are placed
    pub changepoint_range: f64,
    /// Ridge penalty on changepoint deltas
    pub changepoint_penalty: f64,
    /// Ridge penalty on seasonal and holiday coefficients
    pub seasonality_penalty: f64,
    /// Fourier order of the yearly component
    pub yearly_order: usize,
    /// Fourier order of the weekly component
    pub weekly_order: usize,
    /// Include the US holiday calendar
    pub holidays: bool,
    /// Width of the uncertainty interval, in (0, 1)
    pub interval_width: f64,
    /// Simulated paths used for the uncertainty interval
    pub uncertainty_samples: usize,
    /// Seed for the uncertainty simulation; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SeasonalParams {
    fn default() -> Self {
        Self {
            seasonality_mode: SeasonalityMode::Multiplicative,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_penalty: 10.0,
            seasonality_penalty: 1.0,
            yearly_order: 10,
            weekly_order: 3,
            holidays: true,
            interval_width: 0.8,
            uncertainty_samples: 1000,
            seed: None,
        }
    }
}

impl SeasonalParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::ConfigError(
                "changepoint_range must be in (0, 1]".to_string(),
            ));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::ConfigError(
                "interval_width must be between 0 and 1".to_string(),
            ));
        }
        if !(self.changepoint_penalty > 0.0 && self.seasonality_penalty > 0.0) {
            return Err(ForecastError::ConfigError(
                "Ridge penalties must be positive".to_string(),
            ));
        }
        if self.uncertainty_samples == 0 {
            return Err(ForecastError::ConfigError(
                "uncertainty_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters of the gradient-boosted tree ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostedTreesParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub min_samples_split: usize,
    /// Fewer historical rows than this fail to fit
    pub min_training_rows: usize,
}

impl Default for BoostedTreesParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_depth: 6,
            min_samples_leaf: 1,
            min_samples_split: 2,
            min_training_rows: 5,
        }
    }
}

impl BoostedTreesParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ForecastError::ConfigError(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ForecastError::ConfigError(
                "learning_rate must be in (0, 1]".to_string(),
            ));
        }
        if self.max_depth == 0 || self.min_samples_leaf == 0 || self.min_samples_split < 2 {
            return Err(ForecastError::ConfigError(
                "Tree size limits must allow at least one split".to_string(),
            ));
        }
        Ok(())
    }
}

/// Forecasting methods to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSet {
    pub seasonal: bool,
    pub boosted_trees: bool,
}

impl MethodSet {
    pub fn both() -> Self {
        Self {
            seasonal: true,
            boosted_trees: true,
        }
    }

    pub fn seasonal_only() -> Self {
        Self {
            seasonal: true,
            boosted_trees: false,
        }
    }

    pub fn boosted_trees_only() -> Self {
        Self {
            seasonal: false,
            boosted_trees: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.seasonal && !self.boosted_trees
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        Self::both()
    }
}

/// Everything the pipeline needs besides the series itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days to forecast past the last observation
    pub horizon_days: usize,
    #[serde(default)]
    pub methods: MethodSet,
    #[serde(default)]
    pub seasonal: SeasonalParams,
    #[serde(default)]
    pub boosted_trees: BoostedTreesParams,
}

impl ForecastConfig {
    /// Default parameters, both methods
    pub fn new(horizon_days: usize) -> Self {
        Self {
            horizon_days,
            methods: MethodSet::default(),
            seasonal: SeasonalParams::default(),
            boosted_trees: BoostedTreesParams::default(),
        }
    }

    pub fn with_methods(mut self, methods: MethodSet) -> Self {
        self.methods = methods;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_horizon(self.horizon_days)?;
        if self.methods.is_empty() {
            return Err(ForecastError::ConfigError(
                "At least one forecasting method must be selected".to_string(),
            ));
        }
        if self.methods.seasonal {
            self.seasonal.validate()?;
        }
        if self.methods.boosted_trees {
            self.boosted_trees.validate()?;
        }
        Ok(())
    }
}

pub(crate) fn validate_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::ConfigError(
            "Horizon must be at least one day".to_string(),
        ));
    }
    Ok(())
}
