//! Station and line tables, and series selection over them

use crate::error::{DataLoadError, Result};
use crate::loader::{DataLoader, RidershipRecord};
use chrono::NaiveDate;
use forecast_compare::TimeSeries;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// File stem of the per-station table
pub const STATION_TABLE: &str = "daily_traffic_by_station";
/// File stem of the per-line table
pub const LINE_TABLE: &str = "daily_traffic_by_line";
/// Key column of the per-station table
pub const STATION_COLUMN: &str = "station";
/// Key column of the per-line table
pub const LINE_COLUMN: &str = "linename";

/// Which series to forecast
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "by", content = "name", rename_all = "snake_case")]
pub enum DatasetSelection {
    /// Traffic summed over all stations
    #[default]
    Total,
    Station(String),
    Line(String),
}

/// Daily traffic by station and by line
#[derive(Debug, Clone, Default)]
pub struct RidershipDataset {
    stations: Vec<RidershipRecord>,
    lines: Vec<RidershipRecord>,
}

impl RidershipDataset {
    pub fn new(stations: Vec<RidershipRecord>, lines: Vec<RidershipRecord>) -> Self {
        Self { stations, lines }
    }

    /// Load both tables from `dir`, preferring Parquet over CSV
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let stations = DataLoader::read_table(locate_table(dir, STATION_TABLE)?, STATION_COLUMN)?;
        let lines = DataLoader::read_table(locate_table(dir, LINE_TABLE)?, LINE_COLUMN)?;

        info!(
            dir = %dir.display(),
            station_rows = stations.len(),
            line_rows = lines.len(),
            "ridership dataset loaded"
        );
        Ok(Self::new(stations, lines))
    }

    pub fn station_records(&self) -> &[RidershipRecord] {
        &self.stations
    }

    pub fn line_records(&self) -> &[RidershipRecord] {
        &self.lines
    }

    /// Station names in order of first appearance
    pub fn stations(&self) -> Vec<&str> {
        unique_keys(&self.stations)
    }

    /// Line names in order of first appearance
    pub fn lines(&self) -> Vec<&str> {
        unique_keys(&self.lines)
    }

    /// Daily series for `selection`, traffic summed per date
    pub fn series(&self, selection: &DatasetSelection) -> Result<TimeSeries> {
        let totals = match selection {
            DatasetSelection::Total => sum_by_date(self.stations.iter()),
            DatasetSelection::Station(name) => {
                sum_by_date(self.stations.iter().filter(|r| &r.key == name))
            }
            DatasetSelection::Line(name) => {
                sum_by_date(self.lines.iter().filter(|r| &r.key == name))
            }
        };

        if totals.is_empty() {
            return Err(DataLoadError::UnknownSeries(match selection {
                DatasetSelection::Total => "total (no station records)".to_string(),
                DatasetSelection::Station(name) => format!("station '{}'", name),
                DatasetSelection::Line(name) => format!("line '{}'", name),
            }));
        }

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = totals.into_iter().unzip();
        Ok(TimeSeries::new(dates, values)?)
    }
}

fn locate_table(dir: &Path, stem: &str) -> Result<PathBuf> {
    ["parquet", "csv"]
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            DataLoadError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}.parquet or {}.csv not found in {}", stem, stem, dir.display()),
            ))
        })
}

fn unique_keys(records: &[RidershipRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.key.as_str())
        .filter(|key| seen.insert(*key))
        .collect()
}

fn sum_by_date<'a>(records: impl Iterator<Item = &'a RidershipRecord>) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.date).or_insert(0.0) += record.traffic;
    }
    totals
}
