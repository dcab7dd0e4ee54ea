//! Shared test utilities and fixture generators

#![allow(dead_code)]

use korelasi::pipeline::RawValue;
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Convert a slice of floats into raw numeric cells
pub fn numbers(values: &[f64]) -> Vec<RawValue> {
    values.iter().copied().map(RawValue::from).collect()
}

/// Convert a slice of strings into raw text cells
pub fn texts(values: &[&str]) -> Vec<RawValue> {
    values.iter().copied().map(RawValue::from).collect()
}

/// Data 1 of a paired example: yearly income per region
pub fn create_income_dataframe() -> DataFrame {
    df! {
        "year" => [2019i32, 2020, 2021, 2022, 2023, 2024],
        "region" => ["A", "A", "A", "B", "B", "B"],
        "income" => [10.0f64, 12.0, 15.0, 11.0, 14.0, 18.0],
    }
    .unwrap()
}

/// Data 2 of a paired example: yearly cases per region, rows in a different order
pub fn create_cases_dataframe() -> DataFrame {
    df! {
        "year" => [2024i32, 2023, 2022, 2021, 2020, 2019],
        "region" => ["B", "B", "B", "A", "A", "A"],
        "cases" => [36.0f64, 28.0, 22.0, 30.0, 24.0, 20.0],
    }
    .unwrap()
}

/// Create a temporary directory with a CSV file written from raw lines
pub fn create_temp_csv_from_lines(name: &str, lines: &[&str]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join(name);

    let mut file = std::fs::File::create(&csv_path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Create a temporary xlsx workbook with two sheets.
///
/// "Summary" comes first and holds a single note. "Raw" holds yearly income
/// and cases per region; the `cases` column mixes numbers with a text cell
/// and a blank.
pub fn create_temp_xlsx() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let xlsx_path = temp_dir.path().join("regions.xlsx");

    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary").unwrap();
    summary.write_string(0, 0, "note").unwrap();
    summary.write_string(1, 0, "see Raw").unwrap();

    let raw = workbook.add_worksheet();
    raw.set_name("Raw").unwrap();
    for (col, header) in ["year", "region", "income", "cases"].iter().enumerate() {
        raw.write_string(0, col as u16, *header).unwrap();
    }
    let rows: [(f64, &str, f64, Option<&str>); 5] = [
        (2019.0, "A", 10.0, Some("20")),
        (2020.0, "A", 12.0, Some("24")),
        (2021.0, "A", 15.0, Some("n/a")),
        (2022.0, "B", 11.0, None),
        (2023.0, "B", 14.0, Some("28")),
    ];
    for (idx, (year, region, income, cases)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        raw.write_number(row, 0, *year).unwrap();
        raw.write_string(row, 1, *region).unwrap();
        raw.write_number(row, 2, *income).unwrap();
        match cases {
            Some("n/a") => {
                raw.write_string(row, 3, "n/a").unwrap();
            }
            Some(value) => {
                raw.write_number(row, 3, value.parse::<f64>().unwrap()).unwrap();
            }
            None => {}
        }
    }

    workbook.save(&xlsx_path).unwrap();

    (temp_dir, xlsx_path)
}

/// Assert two floats are equal within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} ± {}, got {}",
        expected,
        tol,
        actual
    );
}
