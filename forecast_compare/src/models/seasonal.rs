//! Seasonal decomposition model.
//!
//! The series is modelled as a piecewise-linear trend combined with Fourier
//! seasonality (yearly, weekly) and US holiday effects:
//!
//! * multiplicative: `y(t) = trend(t) * (1 + seasonal(t) + holidays(t))`
//! * additive: `y(t) = trend(t) + seasonal(t) + holidays(t)`
//!
//! Time is scaled to `[0, 1]` over the history and values are scaled by
//! their maximum before fitting. The trend is fitted first, then the
//! seasonal and holiday coefficients are fitted to what the trend leaves
//! over. Both stages are ridge regressions. In multiplicative mode the
//! seasonal columns are scaled by the trend rather than dividing the data
//! by it, so stretches where the trend reaches zero (closures) still fit.
//!
//! The uncertainty interval comes from simulated paths: future trend
//! segments gain random changepoints drawn at the historical changepoint
//! rate, and every point gains Gaussian observation noise. Runs without a
//! seed are therefore not reproducible.

use crate::chart::{Figure, Layout, Trace, ACTUAL_COLOR, SEASONAL_COLOR};
use crate::config::{validate_horizon, SeasonalParams, SeasonalityMode};
use crate::error::{ForecastError, Result};
use crate::frame::FutureFrame;
use crate::holidays::HolidayCalendar;
use crate::models::ridge::{dot, ridge_solve};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::series::TimeSeries;
use chrono::{Datelike, NaiveDate};
use rand::distributions::Bernoulli;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};
use statrs::statistics::{Data, OrderStatistics};
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::debug;

/// Effectively unpenalised coefficients (intercept, base slope)
const FREE_PENALTY: f64 = 1e-8;

/// A Fourier seasonal component
#[derive(Debug, Clone, Copy, PartialEq)]
struct FourierTerm {
    period: f64,
    order: usize,
}

impl FourierTerm {
    fn features(&self, date: NaiveDate, out: &mut Vec<f64>) {
        let day = date.num_days_from_ce() as f64;
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * day / self.period;
            out.push(angle.sin());
            out.push(angle.cos());
        }
    }
}

/// Seasonal decomposition model with a fixed US holiday calendar
#[derive(Debug, Clone)]
pub struct SeasonalModel {
    name: String,
    params: SeasonalParams,
    calendar: HolidayCalendar,
}

/// Trained seasonal model
#[derive(Debug, Clone)]
pub struct FittedSeasonal {
    name: String,
    params: SeasonalParams,
    calendar: HolidayCalendar,
    /// First historical date, t = 0
    start: NaiveDate,
    /// Days between first and last historical date, t = 1
    span_days: f64,
    /// Values are divided by this before fitting
    y_scale: f64,
    /// Changepoint locations in scaled time
    changepoints: Vec<f64>,
    /// Intercept, base slope, then one delta per changepoint
    trend_coef: Vec<f64>,
    terms: Vec<FourierTerm>,
    holiday_names: Vec<&'static str>,
    seasonal_coef: Vec<f64>,
    /// Residual standard deviation, scaled units
    sigma: f64,
    /// Laplace scale of simulated future changepoints
    delta_scale: f64,
}

impl SeasonalModel {
    pub fn new(params: SeasonalParams) -> Result<Self> {
        params.validate()?;
        let mode = match params.seasonality_mode {
            SeasonalityMode::Additive => "additive",
            SeasonalityMode::Multiplicative => "multiplicative",
        };

        Ok(Self {
            name: format!("Seasonal decomposition ({})", mode),
            params,
            calendar: HolidayCalendar::united_states(),
        })
    }
}

impl Default for SeasonalModel {
    fn default() -> Self {
        Self {
            name: "Seasonal decomposition (multiplicative)".to_string(),
            params: SeasonalParams::default(),
            calendar: HolidayCalendar::united_states(),
        }
    }
}

/// Changepoints evenly spaced over the first `range` share of the history
fn changepoint_locations(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * range).floor() as usize;
    let n = n_changepoints.min(hist_size.saturating_sub(1));
    if n == 0 {
        return Vec::new();
    }

    (1..=n)
        .map(|j| {
            let idx = (j as f64 * (hist_size - 1) as f64 / n as f64).round() as usize;
            t[idx]
        })
        .collect()
}

fn trend_row(t: f64, changepoints: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + changepoints.len());
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|c| (t - c).max(0.0)));
    row
}

fn holiday_lookup(
    calendar: &HolidayCalendar,
    dates: &[NaiveDate],
) -> HashMap<NaiveDate, &'static str> {
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return HashMap::new();
    };

    calendar
        .holidays_between(*first, *last)
        .into_iter()
        .map(|h| (h.date, h.name))
        .collect()
}

impl FittedSeasonal {
    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    fn seasonal_row(&self, date: NaiveDate, holidays: &HashMap<NaiveDate, &'static str>) -> Vec<f64> {
        seasonal_row(&self.terms, &self.holiday_names, date, holidays)
    }

    fn combine(&self, trend: f64, seasonal: f64) -> f64 {
        match self.params.seasonality_mode {
            SeasonalityMode::Multiplicative => trend * (1.0 + seasonal),
            SeasonalityMode::Additive => trend + seasonal,
        }
    }

    fn rng(&self) -> StdRng {
        match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// `(location, delta)` of random changepoints after the end of the
    /// history, up to `t_max`
    fn sample_future_changepoints<R: Rng>(
        &self,
        rng: &mut R,
        t_max: f64,
        occurrence: &Bernoulli,
        magnitude: Option<&Exp<f64>>,
    ) -> Vec<(f64, f64)> {
        let Some(magnitude) = magnitude else {
            return Vec::new();
        };
        let future_days = ((t_max - 1.0) * self.span_days).ceil().max(0.0) as usize;

        let mut changepoints = Vec::new();
        for day in 1..=future_days {
            if !occurrence.sample(rng) {
                continue;
            }
            let location = 1.0 + day as f64 / self.span_days;
            let size = magnitude.sample(rng);
            let delta = if rng.gen_bool(0.5) { size } else { -size };
            changepoints.push((location, delta));
        }
        changepoints
    }

    /// Quantile band of simulated paths around the point forecast
    fn intervals(
        &self,
        t: &[f64],
        trend: &[f64],
        seasonal: &[f64],
    ) -> Result<Vec<(f64, f64)>> {
        let samples = self.params.uncertainty_samples;
        let mut rng = self.rng();

        let noise = Normal::new(0.0, self.sigma)
            .map_err(|e| ForecastError::FitError(format!("Invalid noise scale: {}", e)))?;
        let rate = (self.changepoints.len() as f64 / self.span_days).min(1.0);
        let occurrence = Bernoulli::new(rate)
            .map_err(|e| ForecastError::FitError(format!("Invalid changepoint rate: {}", e)))?;
        let magnitude = if self.delta_scale > 0.0 {
            Some(Exp::new(1.0 / self.delta_scale).map_err(|e| {
                ForecastError::FitError(format!("Invalid changepoint scale: {}", e))
            })?)
        } else {
            None
        };
        let t_max = t.iter().cloned().fold(f64::MIN, f64::max);

        let mut paths = vec![Vec::with_capacity(samples); t.len()];
        for _ in 0..samples {
            let future = self.sample_future_changepoints(&mut rng, t_max, &occurrence, magnitude.as_ref());
            for (i, &ti) in t.iter().enumerate() {
                let shift: f64 = future
                    .iter()
                    .filter(|(location, _)| ti > *location)
                    .map(|(location, delta)| delta * (ti - location))
                    .sum();
                let value = self.combine(trend[i] + shift, seasonal[i]) + noise.sample(&mut rng);
                paths[i].push(value * self.y_scale);
            }
        }

        let lower_q = (1.0 - self.params.interval_width) / 2.0;
        let upper_q = (1.0 + self.params.interval_width) / 2.0;

        Ok(paths
            .into_iter()
            .map(|path| {
                let mut data = Data::new(path);
                (data.quantile(lower_q), data.quantile(upper_q))
            })
            .collect())
    }
}

fn seasonal_row(
    terms: &[FourierTerm],
    holiday_names: &[&'static str],
    date: NaiveDate,
    holidays: &HashMap<NaiveDate, &'static str>,
) -> Vec<f64> {
    let mut row = Vec::new();
    for term in terms {
        term.features(date, &mut row);
    }
    let today = holidays.get(&date);
    row.extend(
        holiday_names
            .iter()
            .map(|name| if today == Some(name) { 1.0 } else { 0.0 }),
    );
    row
}

impl ForecastModel for SeasonalModel {
    type Trained = FittedSeasonal;

    fn train(&self, series: &TimeSeries) -> Result<Self::Trained> {
        let dates = series.dates();
        let values = series.values();

        if dates.len() < 2 {
            return Err(ForecastError::FitError(format!(
                "Seasonal model needs at least two distinct timestamps, got {}",
                dates.len()
            )));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::FitError(format!(
                "Non-finite value {} in training data",
                v
            )));
        }

        let start = series.first_date();
        let span_days = (series.last_date() - start).num_days() as f64;
        let max = values.iter().cloned().fold(0.0, f64::max);
        let y_scale = if max > 0.0 { max } else { 1.0 };
        let y: Vec<f64> = values.iter().map(|v| v / y_scale).collect();
        let t: Vec<f64> = dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days)
            .collect();

        // Trend
        let changepoints =
            changepoint_locations(&t, self.params.n_changepoints, self.params.changepoint_range);
        let trend_x: Vec<Vec<f64>> = t.iter().map(|ti| trend_row(*ti, &changepoints)).collect();
        let mut penalties = vec![FREE_PENALTY; 2];
        penalties.extend(std::iter::repeat(self.params.changepoint_penalty).take(changepoints.len()));
        let trend_coef = ridge_solve(&trend_x, &y, &penalties)?;
        let trend: Vec<f64> = trend_x.iter().map(|row| dot(row, &trend_coef)).collect();

        let residual: Vec<f64> = y.iter().zip(&trend).map(|(yi, g)| yi - g).collect();

        // Seasonality and holidays
        let mut terms = Vec::new();
        if span_days >= 730.0 && self.params.yearly_order > 0 {
            terms.push(FourierTerm {
                period: 365.25,
                order: self.params.yearly_order,
            });
        }
        if span_days >= 14.0 && self.params.weekly_order > 0 {
            terms.push(FourierTerm {
                period: 7.0,
                order: self.params.weekly_order,
            });
        }

        let holidays = if self.params.holidays {
            holiday_lookup(&self.calendar, &dates)
        } else {
            HashMap::new()
        };
        let holiday_names: Vec<&'static str> = self
            .calendar
            .names()
            .into_iter()
            .filter(|name| holidays.values().any(|h| h == name))
            .collect();

        let seasonal_x: Vec<Vec<f64>> = dates
            .iter()
            .map(|d| seasonal_row(&terms, &holiday_names, *d, &holidays))
            .collect();
        let n_seasonal = seasonal_x.first().map_or(0, Vec::len);
        let seasonal_coef = if n_seasonal > 0 {
            // y - g = g * s (multiplicative) or s (additive)
            let design: Vec<Vec<f64>> = match self.params.seasonality_mode {
                SeasonalityMode::Multiplicative => seasonal_x
                    .iter()
                    .zip(&trend)
                    .map(|(row, g)| row.iter().map(|x| x * g).collect())
                    .collect(),
                SeasonalityMode::Additive => seasonal_x.clone(),
            };
            ridge_solve(&design, &residual, &vec![self.params.seasonality_penalty; n_seasonal])?
        } else {
            Vec::new()
        };

        let mut fitted = FittedSeasonal {
            name: self.name.clone(),
            params: self.params.clone(),
            calendar: self.calendar.clone(),
            start,
            span_days,
            y_scale,
            delta_scale: 0.0,
            sigma: 0.0,
            changepoints,
            trend_coef,
            terms,
            holiday_names,
            seasonal_coef,
        };

        let sse: f64 = seasonal_x
            .iter()
            .zip(&trend)
            .zip(&y)
            .map(|((row, g), yi)| {
                let yhat = fitted.combine(*g, dot(row, &fitted.seasonal_coef));
                (yi - yhat).powi(2)
            })
            .sum();
        fitted.sigma = (sse / y.len() as f64).sqrt();

        let deltas = &fitted.trend_coef[2..];
        if !deltas.is_empty() {
            fitted.delta_scale = deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64;
        }

        debug!(
            rows = y.len(),
            changepoints = fitted.changepoints.len(),
            seasonal_columns = n_seasonal,
            holidays = fitted.holiday_names.len(),
            sigma = fitted.sigma,
            "fitted seasonal model"
        );

        Ok(fitted)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for FittedSeasonal {
    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult> {
        if dates.is_empty() {
            return ForecastResult::new(Vec::new(), Vec::new());
        }

        let holidays = holiday_lookup(&self.calendar, dates);
        let t: Vec<f64> = dates.iter().map(|d| self.scaled_time(*d)).collect();
        let trend: Vec<f64> = t
            .iter()
            .map(|ti| dot(&trend_row(*ti, &self.changepoints), &self.trend_coef))
            .collect();
        let seasonal: Vec<f64> = dates
            .iter()
            .map(|d| dot(&self.seasonal_row(*d, &holidays), &self.seasonal_coef))
            .collect();

        let values = trend
            .iter()
            .zip(&seasonal)
            .map(|(g, s)| self.combine(*g, *s) * self.y_scale)
            .collect();
        let intervals = self.intervals(&t, &trend, &seasonal)?;

        ForecastResult::new_with_intervals(dates.to_vec(), values, intervals)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Output of the seasonal forecaster
#[derive(Debug, Clone)]
pub struct SeasonalOutput {
    /// Actual values, fitted/forecast line and uncertainty band
    pub chart: Figure,
    /// Historical dates extended by the horizon
    pub frame: FutureFrame,
    /// Fit and forecast over the whole frame, with intervals
    pub forecast: ForecastResult,
}

/// Fit the seasonal model on `series` and forecast `horizon` days ahead
pub fn forecast_seasonal(
    series: TimeSeries,
    horizon: usize,
    params: &SeasonalParams,
) -> Result<SeasonalOutput> {
    validate_horizon(horizon)?;
    let model = SeasonalModel::new(params.clone())?;
    let fitted = model.train(&series)?;

    let frame = FutureFrame::extend(&series, horizon)?;
    let forecast = fitted.predict(frame.dates())?;
    let chart = plot_seasonal(&series, &forecast);

    Ok(SeasonalOutput {
        chart,
        frame,
        forecast,
    })
}

/// Chart of the seasonal forecast against the observed values
pub fn plot_seasonal(series: &TimeSeries, forecast: &ForecastResult) -> Figure {
    let mut data = Vec::new();

    if let Some(intervals) = forecast.intervals() {
        let lower = intervals.iter().map(|(l, _)| *l).collect();
        let upper = intervals.iter().map(|(_, u)| *u).collect();
        data.push(Trace::band_edge("Lower bound", forecast.dates().to_vec(), lower, false));
        data.push(Trace::band_edge("Upper bound", forecast.dates().to_vec(), upper, true));
    }

    data.push(Trace::line(
        "Predicted",
        forecast.dates().to_vec(),
        forecast.values().to_vec(),
        SEASONAL_COLOR,
    ));
    data.push(Trace::markers(
        "Actual",
        series.dates(),
        series.values(),
        ACTUAL_COLOR,
    ));

    Figure::new(data, Layout::time_series(false))
}
