//! Reading ridership tables from CSV or Parquet files

use crate::error::{DataLoadError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Name of the traffic column in every ridership table
pub const TRAFFIC_COLUMN: &str = "traffic";

const DATE_COLUMN_CANDIDATES: [&str; 5] = ["datetime", "date", "ds", "timestamp", "time"];

/// One row of a ridership table: daily traffic for a station or a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidershipRecord {
    pub date: NaiveDate,
    /// Station name or line name
    pub key: String,
    pub traffic: f64,
}

impl RidershipRecord {
    pub fn new(date: NaiveDate, key: impl Into<String>, traffic: f64) -> Self {
        Self {
            date,
            key: key.into(),
            traffic,
        }
    }
}

/// Data loader for ridership tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Read a table and return one record per row.
    ///
    /// The file format follows the extension (`.csv` or `.parquet`).
    /// `key_column` names the column holding the station or line name.
    pub fn read_table<P: AsRef<Path>>(path: P, key_column: &str) -> Result<Vec<RidershipRecord>> {
        let path = path.as_ref();
        let df = Self::read_frame(path)?;
        debug!(path = %path.display(), rows = df.height(), "table read");
        Self::records_from_dataframe(&df, key_column)
    }

    /// Read a CSV or Parquet file into a DataFrame
    pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let file = File::open(path)?;
        let df = match extension.as_deref() {
            Some("csv") => CsvReader::new(file)
                .infer_schema(None)
                .has_header(true)
                .finish()?,
            Some("parquet") | Some("pq") => ParquetReader::new(file).finish()?,
            _ => {
                return Err(DataLoadError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Unsupported table format: {}", path.display()),
                )))
            }
        };

        Ok(df)
    }

    /// Convert a DataFrame with date, key and traffic columns into records
    pub fn records_from_dataframe(df: &DataFrame, key_column: &str) -> Result<Vec<RidershipRecord>> {
        let date_column = Self::detect_date_column(df)?;

        let dates = Self::dates(df.column(&date_column)?)?;
        let keys = Self::keys(
            df.column(key_column)
                .map_err(|_| DataLoadError::MissingColumn(key_column.to_string()))?,
        )?;
        let traffic = Self::traffic(
            df.column(TRAFFIC_COLUMN)
                .map_err(|_| DataLoadError::MissingColumn(TRAFFIC_COLUMN.to_string()))?,
        )?;

        Ok(dates
            .into_iter()
            .zip(keys)
            .zip(traffic)
            .map(|((date, key), traffic)| RidershipRecord { date, key, traffic })
            .collect())
    }

    /// Find the date column: a well-known name first, then any temporal column
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for candidate in DATE_COLUMN_CANDIDATES {
            if let Some(name) = column_names
                .iter()
                .find(|name| name.eq_ignore_ascii_case(candidate))
            {
                return Ok(name.to_string());
            }
        }

        for name in &column_names {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date") || lower_name.contains("time") {
                return Ok(name.to_string());
            }
        }

        if let Some(column) = df.get_columns().iter().find(|c| c.dtype().is_temporal()) {
            return Ok(column.name().to_string());
        }

        Err(DataLoadError::MissingColumn("datetime".to_string()))
    }

    fn dates(column: &Series) -> Result<Vec<NaiveDate>> {
        let name = column.name();
        if column.null_count() > 0 {
            return Err(DataLoadError::invalid(name, "missing dates"));
        }

        match column.dtype() {
            DataType::Utf8 => column
                .utf8()?
                .into_iter()
                .flatten()
                .map(|text| {
                    parse_date(text).ok_or_else(|| {
                        DataLoadError::invalid(name, format!("cannot parse '{}' as a date", text))
                    })
                })
                .collect(),
            DataType::Date => {
                let days = column.cast(&DataType::Int32)?;
                days.i32()?
                    .into_iter()
                    .flatten()
                    .map(|d| {
                        epoch_date(d as i64)
                            .ok_or_else(|| DataLoadError::invalid(name, "date out of range"))
                    })
                    .collect()
            }
            DataType::Datetime(unit, _) => {
                let per_day = match unit {
                    TimeUnit::Nanoseconds => 86_400_000_000_000,
                    TimeUnit::Microseconds => 86_400_000_000,
                    TimeUnit::Milliseconds => 86_400_000,
                };
                let ticks = column.cast(&DataType::Int64)?;
                ticks
                    .i64()?
                    .into_iter()
                    .flatten()
                    .map(|t| {
                        epoch_date(t.div_euclid(per_day))
                            .ok_or_else(|| DataLoadError::invalid(name, "datetime out of range"))
                    })
                    .collect()
            }
            other => Err(DataLoadError::invalid(
                name,
                format!("unsupported date type {}", other),
            )),
        }
    }

    fn keys(column: &Series) -> Result<Vec<String>> {
        let name = column.name();
        if column.null_count() > 0 {
            return Err(DataLoadError::invalid(name, "missing names"));
        }

        let text = column.cast(&DataType::Utf8)?;
        let keys = text
            .utf8()?
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        Ok(keys)
    }

    fn traffic(column: &Series) -> Result<Vec<f64>> {
        let name = column.name();
        if column.null_count() > 0 {
            return Err(DataLoadError::invalid(name, "missing traffic values"));
        }

        let values = column
            .cast(&DataType::Float64)
            .map_err(|e| DataLoadError::invalid(name, e.to_string()))?;
        let values: Vec<f64> = values.f64()?.into_iter().flatten().collect();

        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(DataLoadError::invalid(
                name,
                format!("traffic must be finite and non-negative, got {}", bad),
            ));
        }

        Ok(values)
    }
}

fn epoch_date(days: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days))
}

/// Parse a date, accepting a trailing time of day
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| dt.date())
}
