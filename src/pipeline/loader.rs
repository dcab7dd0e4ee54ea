//! Dataset loader for CSV, Parquet and spreadsheet files

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;

use crate::pipeline::extract::{raw_values, RawValue};

/// Spreadsheet extensions handled through calamine
const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsb", "ods"];

/// Column aliases used while joining Data 1 and Data 2 on key columns
const JOINED_X: &str = "__korelasi_x";
const JOINED_Y: &str = "__korelasi_y";

/// Options controlling how a dataset is read
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Number of rows used for CSV schema inference (0 = full scan)
    pub infer_schema_length: usize,
    /// Worksheet name for spreadsheet files (first sheet when None)
    pub sheet: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10000,
            sheet: None,
        }
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset into memory, picking the reader from the file extension.
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<DataFrame> {
    let extension = file_extension(path);

    let df = match extension.as_str() {
        "csv" => {
            let schema_length = if options.infer_schema_length == 0 {
                None
            } else {
                Some(options.infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .and_then(|lf| lf.collect())
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .and_then(|lf| lf.collect())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        ext if SPREADSHEET_EXTENSIONS.contains(&ext) => {
            load_spreadsheet(path, options.sheet.as_deref())?
        }
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet, xlsx, xls, xlsb, ods",
            extension
        ),
    };

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded dataset"
    );

    Ok(df)
}

/// Get the column names of a dataset without running an analysis.
pub fn get_column_names(path: &Path, options: &LoadOptions) -> Result<Vec<String>> {
    let df = load_dataset(path, options)?;
    Ok(df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect())
}

/// Read the raw values of one column, listing the available columns when it is absent.
pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<RawValue>> {
    let column = df.column(name).map_err(|_| {
        let available: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        anyhow::anyhow!(
            "Column '{}' not found. Available columns: {:?}",
            name,
            available
        )
    })?;
    Ok(raw_values(column))
}

/// Keep only rows where `column` equals `value`, e.g. `year=2020`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    pub column: String,
    pub value: String,
}

impl FromStr for RowFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", s))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(format!("missing column name in '{}'", s));
        }
        Ok(Self {
            column: column.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.value)
    }
}

/// Check that every filter column exists in at least one of `frames`.
pub fn check_filter_columns(filters: &[RowFilter], frames: &[&DataFrame]) -> Result<()> {
    for filter in filters {
        let found = frames
            .iter()
            .any(|df| df.column(&filter.column).is_ok());
        if !found {
            anyhow::bail!(
                "Filter column '{}' not found in Data 1 or Data 2",
                filter.column
            );
        }
    }
    Ok(())
}

/// Apply the filters whose column exists in `df`, skipping the rest.
///
/// Values are compared as strings, so `year=2020` matches integer and text years.
pub fn filter_rows(df: &DataFrame, filters: &[RowFilter]) -> Result<DataFrame> {
    let predicate = filters
        .iter()
        .filter(|f| df.column(&f.column).is_ok())
        .map(|f| {
            col(f.column.as_str())
                .cast(DataType::String)
                .eq(lit(f.value.clone()))
        })
        .reduce(|acc, expr| acc.and(expr));

    let Some(predicate) = predicate else {
        return Ok(df.clone());
    };

    let filtered = df
        .clone()
        .lazy()
        .filter(predicate)
        .collect()
        .context("Failed to filter rows")?;

    tracing::debug!(
        before = df.height(),
        after = filtered.height(),
        "Filtered rows"
    );

    Ok(filtered)
}

/// Pair X (from `left`) and Y (from `right`) by matching key columns instead of row order.
///
/// Performs an inner join; keys are compared as strings so that a year stored as
/// an integer in one file and as text in another still matches.
pub fn align_by_keys(
    left: &DataFrame,
    x_column: &str,
    right: &DataFrame,
    y_column: &str,
    keys: &[String],
) -> Result<(Vec<RawValue>, Vec<RawValue>)> {
    if keys.is_empty() {
        anyhow::bail!("At least one key column is required for a key join");
    }

    for (df, label) in [(left, "Data 1"), (right, "Data 2")] {
        for key in keys {
            if df.column(key).is_err() {
                anyhow::bail!("Key column '{}' not found in {}", key, label);
            }
        }
    }
    column_values(left, x_column)?;
    column_values(right, y_column)?;

    let key_exprs: Vec<Expr> = keys
        .iter()
        .map(|k| col(k.as_str()).cast(DataType::String))
        .collect();
    let key_cols: Vec<Expr> = keys.iter().map(|k| col(k.as_str())).collect();

    let mut left_select = key_exprs.clone();
    left_select.push(col(x_column).alias(JOINED_X));
    let mut right_select = key_exprs;
    right_select.push(col(y_column).alias(JOINED_Y));

    let joined = left
        .clone()
        .lazy()
        .select(left_select)
        .join(
            right.clone().lazy().select(right_select),
            key_cols.clone(),
            key_cols,
            JoinArgs::new(JoinType::Inner),
        )
        .collect()
        .context("Failed to join Data 1 and Data 2 on key columns")?;

    tracing::debug!(
        keys = ?keys,
        left_rows = left.height(),
        right_rows = right.height(),
        joined_rows = joined.height(),
        "Joined datasets on keys"
    );

    Ok((
        column_values(&joined, JOINED_X)?,
        column_values(&joined, JOINED_Y)?,
    ))
}

/// Load one worksheet into a DataFrame. The first row is the header.
///
/// Columns whose non-empty cells are all numeric become Float64; anything else
/// is kept as text and coerced later by the extractor.
fn load_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Spreadsheet has no sheets: {}", path.display()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet '{}' in {}", sheet_name, path.display()))?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(DataFrame::empty()),
    };

    let names = header_names(header);
    let mut cells: Vec<Vec<Data>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (idx, values) in cells.iter_mut().enumerate() {
            values.push(row.get(idx).cloned().unwrap_or(Data::Empty));
        }
    }

    let columns: Vec<Column> = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| sheet_column(&name, &values))
        .collect();

    DataFrame::new(columns)
        .with_context(|| format!("Failed to build table from sheet '{}'", sheet_name))
}

fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Data::Empty => format!("column_{}", idx + 1),
                other => other.to_string().trim().to_string(),
            };
            let mut name = base.clone();
            let mut suffix = 2;
            while !seen.insert(name.clone()) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            name
        })
        .collect()
}

fn sheet_column(name: &str, values: &[Data]) -> Column {
    let numeric = values.iter().all(|v| {
        matches!(
            v,
            Data::Int(_) | Data::Float(_) | Data::Bool(_) | Data::Empty
        )
    });

    if numeric {
        let floats: Vec<Option<f64>> = values
            .iter()
            .map(|v| match v {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                Data::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                _ => None,
            })
            .collect();
        Column::new(name.into(), floats)
    } else {
        let texts: Vec<Option<String>> = values
            .iter()
            .map(|v| match v {
                Data::Empty | Data::Error(_) => None,
                other => Some(other.to_string()),
            })
            .collect();
        Column::new(name.into(), texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names_fill_blanks_and_dedupe() {
        let header = vec![
            Data::String("year".to_string()),
            Data::Empty,
            Data::String("year".to_string()),
        ];
        assert_eq!(header_names(&header), vec!["year", "column_2", "year_2"]);
    }

    #[test]
    fn test_sheet_column_numeric_detection() {
        let col = sheet_column("n", &[Data::Int(1), Data::Empty, Data::Float(2.5)]);
        assert_eq!(col.dtype(), &DataType::Float64);
        assert_eq!(col.null_count(), 1);

        let col = sheet_column("t", &[Data::Int(1), Data::String("n/a".to_string())]);
        assert_eq!(col.dtype(), &DataType::String);
    }

    #[test]
    fn test_row_filter_parsing() {
        let filter: RowFilter = " year = 2020 ".parse().unwrap();
        assert_eq!(filter.column, "year");
        assert_eq!(filter.value, "2020");
        assert_eq!(filter.to_string(), "year=2020");

        let filter: RowFilter = "disease=".parse().unwrap();
        assert_eq!(filter.value, "");

        assert!("year".parse::<RowFilter>().is_err());
        assert!("=2020".parse::<RowFilter>().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = load_dataset(Path::new("data.json"), &LoadOptions::default());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported file format"));
    }
}
