//! Gradient-boosted regression trees on calendar features

use crate::chart::{Figure, Layout, Trace, ACTUAL_COLOR, SEASONAL_COLOR};
use crate::config::BoostedTreesParams;
use crate::error::{ForecastError, Result};
use crate::features::create_features;
use crate::frame::FutureFrame;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::TimeSeries;
use chrono::NaiveDate;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use std::fmt;
use tracing::debug;

type RegressionTree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Gradient boosting with squared loss: every tree is fitted to the
/// residuals of the ensemble so far and added with the learning rate.
#[derive(Debug, Clone)]
pub struct BoostedTrees {
    name: String,
    params: BoostedTreesParams,
}

/// Trained tree ensemble
pub struct FittedBoostedTrees {
    name: String,
    learning_rate: f64,
    /// Mean of the training target
    base: f64,
    trees: Vec<RegressionTree>,
}

impl fmt::Debug for FittedBoostedTrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedBoostedTrees")
            .field("name", &self.name)
            .field("learning_rate", &self.learning_rate)
            .field("base", &self.base)
            .field("trees", &self.trees.len())
            .finish()
    }
}

impl BoostedTrees {
    pub fn new(params: BoostedTreesParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            name: format!(
                "Boosted trees (n_estimators={}, learning_rate={})",
                params.n_estimators, params.learning_rate
            ),
            params,
        })
    }

    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.params.max_depth)
            .with_min_samples_leaf(self.params.min_samples_leaf)
            .with_min_samples_split(self.params.min_samples_split)
    }
}

impl Default for BoostedTrees {
    fn default() -> Self {
        let params = BoostedTreesParams::default();
        Self {
            name: format!(
                "Boosted trees (n_estimators={}, learning_rate={})",
                params.n_estimators, params.learning_rate
            ),
            params,
        }
    }
}

impl ForecastModel for BoostedTrees {
    type Trained = FittedBoostedTrees;

    fn train(&self, series: &TimeSeries) -> Result<Self::Trained> {
        let values = series.values();
        let (train, _features) = create_features(&series.dates(), Some(&values))?;

        if train.len() < self.params.min_training_rows {
            return Err(ForecastError::FitError(format!(
                "Tree ensemble needs at least {} rows, got {}",
                self.params.min_training_rows,
                train.len()
            )));
        }

        let x = DenseMatrix::from_2d_vec(&train.matrix());
        let base = values.iter().sum::<f64>() / values.len() as f64;
        let mut prediction = vec![base; values.len()];
        let mut trees = Vec::with_capacity(self.params.n_estimators);

        for round in 0..self.params.n_estimators {
            let residuals: Vec<f64> = values
                .iter()
                .zip(&prediction)
                .map(|(y, f)| y - f)
                .collect();
            let tree = RegressionTree::fit(&x, &residuals, self.tree_parameters())?;
            let step = tree.predict(&x)?;
            for (f, s) in prediction.iter_mut().zip(&step) {
                *f += self.params.learning_rate * s;
            }
            trees.push(tree);

            if round % 100 == 0 {
                let mse = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
                debug!(round, mse, "boosting");
            }
        }

        Ok(FittedBoostedTrees {
            name: self.name.clone(),
            learning_rate: self.params.learning_rate,
            base,
            trees,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for FittedBoostedTrees {
    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult> {
        if dates.is_empty() {
            return ForecastResult::new(Vec::new(), Vec::new());
        }

        let (frame, _features) = create_features(dates, None)?;
        let x = DenseMatrix::from_2d_vec(&frame.matrix());
        let mut values = vec![self.base; dates.len()];

        for tree in &self.trees {
            let step = tree.predict(&x)?;
            for (v, s) in values.iter_mut().zip(&step) {
                *v += self.learning_rate * s;
            }
        }

        ForecastResult::new(dates.to_vec(), values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Output of the tree forecaster
#[derive(Debug, Clone)]
pub struct TreeOutput {
    /// Actual values with fitted and forecast lines
    pub chart: Figure,
    /// Predictions on the historical rows
    pub fitted: ForecastResult,
    /// Predictions on every row of the future frame
    pub forecast: ForecastResult,
}

/// The frame must start with the history and reach at least its end
fn check_frame_domain(series: &TimeSeries, frame: &FutureFrame) -> Result<()> {
    let (Some(first), Some(last)) = (frame.dates().first(), frame.dates().last()) else {
        return Err(ForecastError::DataError("Future frame is empty".to_string()));
    };

    if *first != series.first_date() || *last < series.last_date() {
        return Err(ForecastError::DataError(format!(
            "Future frame {}..{} does not extend the history {}..{}",
            first,
            last,
            series.first_date(),
            series.last_date()
        )));
    }
    Ok(())
}

/// Train the tree ensemble on `series` and predict over `frame`
pub fn forecast_boosted_trees(
    series: TimeSeries,
    frame: &FutureFrame,
    params: &BoostedTreesParams,
) -> Result<TreeOutput> {
    check_frame_domain(&series, frame)?;

    let model = BoostedTrees::new(params.clone())?;
    let fitted_model = model.train(&series)?;
    let fitted = fitted_model.predict(&series.dates())?;
    let forecast = fitted_model.predict(frame.dates())?;
    let chart = plot_boosted_trees(&series, &fitted, &forecast);

    Ok(TreeOutput {
        chart,
        fitted,
        forecast,
    })
}

/// Chart of the tree predictions against the observed values
pub fn plot_boosted_trees(
    series: &TimeSeries,
    fitted: &ForecastResult,
    forecast: &ForecastResult,
) -> Figure {
    let data = vec![
        Trace::markers("Actual", series.dates(), series.values(), ACTUAL_COLOR),
        Trace::line(
            "Fitted",
            fitted.dates().to_vec(),
            fitted.values().to_vec(),
            SEASONAL_COLOR,
        ),
        Trace::line(
            "Predicted",
            forecast.dates().to_vec(),
            forecast.values().to_vec(),
            SEASONAL_COLOR,
        ),
    ];

    Figure::new(data, Layout::time_series(false))
}
