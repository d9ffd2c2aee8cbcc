use chrono::NaiveDate;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use ridership_data::{DataLoadError, DataLoader, RidershipRecord};
use std::fs::File;
use std::io::Write;
use tempfile::Builder;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_read_csv_table() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "datetime,station,traffic").unwrap();
    writeln!(file, "2019-01-01,59 ST,1200").unwrap();
    writeln!(file, "2019-01-01,ASTOR PL,800").unwrap();
    writeln!(file, "2019-01-02,59 ST,1300.5").unwrap();

    let records = DataLoader::read_table(file.path(), "station").unwrap();

    assert_eq!(
        records,
        vec![
            RidershipRecord::new(date("2019-01-01"), "59 ST", 1200.0),
            RidershipRecord::new(date("2019-01-01"), "ASTOR PL", 800.0),
            RidershipRecord::new(date("2019-01-02"), "59 ST", 1300.5),
        ]
    );
}

#[test]
fn test_csv_with_timestamps() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "datetime,linename,traffic").unwrap();
    writeln!(file, "2019-01-01 00:00:00,A,10").unwrap();
    writeln!(file, "2019-01-02 00:00:00,A,12").unwrap();

    let records = DataLoader::read_table(file.path(), "linename").unwrap();
    assert_eq!(records[1].date, date("2019-01-02"));
    assert_eq!(records[1].key, "A");
}

#[test]
fn test_read_parquet_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lines.parquet");

    let mut df = df!(
        "datetime" => &["2020-03-01", "2020-03-02"],
        "linename" => &["NQRW", "NQRW"],
        "traffic" => &[500.0, 450.0]
    )
    .unwrap();
    ParquetWriter::new(File::create(&path).unwrap())
        .finish(&mut df)
        .unwrap();

    let records = DataLoader::read_table(&path, "linename").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, date("2020-03-01"));
    assert_eq!(records[1].traffic, 450.0);
}

#[test]
fn test_date_and_datetime_columns() {
    // 2023-01-01 is day 19358 after the epoch
    let days = Series::new("datetime", &[19358i32, 19359])
        .cast(&DataType::Date)
        .unwrap();
    let df = DataFrame::new(vec![
        days,
        Series::new("station", &["A", "A"]),
        Series::new("traffic", &[1i64, 2]),
    ])
    .unwrap();
    let records = DataLoader::records_from_dataframe(&df, "station").unwrap();
    assert_eq!(records[0].date, date("2023-01-01"));
    assert_eq!(records[1].traffic, 2.0);

    let millis = Series::new("datetime", &[1_672_531_200_000i64, 1_672_621_200_000])
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .unwrap();
    let df = DataFrame::new(vec![
        millis,
        Series::new("station", &["A", "A"]),
        Series::new("traffic", &[1.0, 2.0]),
    ])
    .unwrap();
    let records = DataLoader::records_from_dataframe(&df, "station").unwrap();
    // The second timestamp is 2023-01-02 01:00, truncated to its day
    assert_eq!(records[1].date, date("2023-01-02"));
}

#[test]
fn test_missing_columns() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "datetime,station,riders").unwrap();
    writeln!(file, "2019-01-01,59 ST,1200").unwrap();

    let result = DataLoader::read_table(file.path(), "station");
    assert!(matches!(result, Err(DataLoadError::MissingColumn(c)) if c == "traffic"));

    let result = DataLoader::read_table(file.path(), "linename");
    assert!(matches!(result, Err(DataLoadError::MissingColumn(c)) if c == "linename"));
}

#[test]
fn test_invalid_values() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "datetime,station,traffic").unwrap();
    writeln!(file, "not a date,59 ST,1200").unwrap();
    let result = DataLoader::read_table(file.path(), "station");
    assert!(matches!(result, Err(DataLoadError::InvalidValue { .. })));

    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "datetime,station,traffic").unwrap();
    writeln!(file, "2019-01-01,59 ST,-5").unwrap();
    let result = DataLoader::read_table(file.path(), "station");
    assert!(matches!(result, Err(DataLoadError::InvalidValue { .. })));
}

#[test]
fn test_unsupported_or_missing_file() {
    let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
    assert!(matches!(
        DataLoader::read_table(file.path(), "station"),
        Err(DataLoadError::Io(_))
    ));

    assert!(matches!(
        DataLoader::read_table("nonexistent_file.csv", "station"),
        Err(DataLoadError::Io(_))
    ));
}
