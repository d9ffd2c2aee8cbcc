//! # metro_dashboard
//!
//! Command-line front end: load the ridership tables, forecast one series
//! and write the charts as JSON and standalone HTML.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use forecast_compare::{Figure, ForecastConfig};
use metro_forecast::{DashboardRequest, DatasetSelection, MethodSet, TrainingWindow};
use ridership_data::RidershipDataset;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum By {
    Total,
    Station,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    Seasonal,
    BoostedTrees,
}

#[derive(Parser)]
#[command(name = "metro_dashboard")]
#[command(about = "Forecast metro ridership and compare two models", long_about = None)]
struct Cli {
    /// Directory holding daily_traffic_by_station and daily_traffic_by_line tables
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Series to forecast
    #[arg(short, long, value_enum, default_value = "total")]
    by: By,

    /// Station or line name
    #[arg(short, long)]
    name: Option<String>,

    /// Days to forecast
    #[arg(long, default_value = "365")]
    horizon: usize,

    /// Train on the last N days only
    #[arg(short, long)]
    window_days: Option<u64>,

    /// Methods to run (default: both)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    methods: Vec<Method>,

    /// Seed for the uncertainty simulation
    #[arg(long)]
    seed: Option<u64>,

    /// JSON request file; overrides the series and forecast options
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// List station and line names, then exit
    #[arg(long)]
    list: bool,

    /// Output directory for the charts
    #[arg(short, long, default_value = "charts")]
    out: PathBuf,
}

impl Cli {
    fn to_request(&self) -> Result<DashboardRequest> {
        if let Some(path) = &self.request {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read request {}", path.display()))?;
            return Ok(DashboardRequest::from_json(&json)?);
        }

        let dataset = match (self.by, &self.name) {
            (By::Total, _) => DatasetSelection::Total,
            (By::Station, Some(name)) => DatasetSelection::Station(name.clone()),
            (By::Line, Some(name)) => DatasetSelection::Line(name.clone()),
            (_, None) => bail!("--name is required with --by station or --by line"),
        };

        let methods = if self.methods.is_empty() {
            MethodSet::both()
        } else {
            MethodSet {
                seasonal: self.methods.contains(&Method::Seasonal),
                boosted_trees: self.methods.contains(&Method::BoostedTrees),
            }
        };

        let mut forecast = ForecastConfig::new(self.horizon).with_methods(methods);
        forecast.seasonal.seed = self.seed;

        Ok(DashboardRequest {
            dataset,
            window: self
                .window_days
                .map_or(TrainingWindow::All, TrainingWindow::LastDays),
            forecast,
        })
    }
}

fn write_chart(out: &Path, stem: &str, title: &str, figure: &Figure) -> Result<()> {
    let json_path = out.join(format!("{}.json", stem));
    fs::write(&json_path, figure.to_json()?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let html_path = out.join(format!("{}.html", stem));
    fs::write(&html_path, figure.to_html(title)?)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;

    info!(chart = stem, path = %html_path.display(), "chart written");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let dataset = RidershipDataset::load(&cli.data_dir)
        .with_context(|| format!("Failed to load ridership data from {}", cli.data_dir.display()))?;

    if cli.list {
        println!("Stations:");
        for station in dataset.stations() {
            println!("  {}", station);
        }
        println!("Lines:");
        for line in dataset.lines() {
            println!("  {}", line);
        }
        return Ok(());
    }

    let request = cli.to_request()?;
    let charts = request.run(&dataset)?;

    fs::create_dir_all(&cli.out)
        .with_context(|| format!("Failed to create {}", cli.out.display()))?;

    if let Some(chart) = &charts.seasonal {
        write_chart(&cli.out, "seasonal", "Seasonal forecast", chart)?;
    }
    if let Some(chart) = &charts.boosted_trees {
        write_chart(&cli.out, "boosted_trees", "Boosted trees forecast", chart)?;
    }
    if let Some(chart) = &charts.comparison {
        write_chart(&cli.out, "comparison", "Forecast comparison", chart)?;
    }

    Ok(())
}
