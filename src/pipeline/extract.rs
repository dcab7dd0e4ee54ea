//! Numeric column extraction - aligns two raw columns into numeric pairs

use polars::prelude::*;
use serde::Serialize;

use crate::error::AnalysisError;

/// A single raw cell as read from a dataset, before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    /// Coerce to a finite float. Unparseable text, blanks, NaN and infinities are missing.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<Option<f64>> for RawValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(RawValue::Missing, RawValue::Number)
    }
}

/// Aligned numeric pairs that survived coercion, in original row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedSample {
    /// `(x, y)` pairs with no missing values
    pub pairs: Vec<(f64, f64)>,
    /// Number of rows in the raw input
    pub total_rows: usize,
    /// Missing or invalid cells in the X column
    pub missing_x: usize,
    /// Missing or invalid cells in the Y column
    pub missing_y: usize,
}

impl CleanedSample {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Total missing/invalid cells across both columns.
    ///
    /// A row where both sides are missing counts twice.
    pub fn n_missing(&self) -> usize {
        self.missing_x + self.missing_y
    }

    /// Rows discarded because at least one side was missing.
    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.pairs.len()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|(x, _)| *x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|(_, y)| *y)
    }
}

/// Coerce two raw columns and keep only rows where both sides are numeric.
///
/// # Errors
/// * `ShapeMismatch` - the columns have different lengths (checked before coercion)
/// * `InsufficientData` - fewer than 2 pairs remain after cleaning
pub fn extract_pairs(x: &[RawValue], y: &[RawValue]) -> Result<CleanedSample, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::ShapeMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let mut pairs = Vec::with_capacity(x.len());
    let mut missing_x = 0usize;
    let mut missing_y = 0usize;

    for (raw_x, raw_y) in x.iter().zip(y.iter()) {
        let vx = raw_x.to_f64();
        let vy = raw_y.to_f64();

        if vx.is_none() {
            missing_x += 1;
        }
        if vy.is_none() {
            missing_y += 1;
        }

        if let (Some(vx), Some(vy)) = (vx, vy) {
            pairs.push((vx, vy));
        }
    }

    tracing::debug!(
        total_rows = x.len(),
        valid = pairs.len(),
        missing_x,
        missing_y,
        "Extracted numeric pairs"
    );

    if pairs.len() < 2 {
        return Err(AnalysisError::InsufficientData { valid: pairs.len() });
    }

    Ok(CleanedSample {
        pairs,
        total_rows: x.len(),
        missing_x,
        missing_y,
    })
}

/// Convert a polars column into raw values, whatever its dtype.
pub fn raw_values(column: &Column) -> Vec<RawValue> {
    column
        .as_materialized_series()
        .iter()
        .map(|value| match value {
            AnyValue::Null => RawValue::Missing,
            AnyValue::String(s) => RawValue::Text(s.to_string()),
            AnyValue::StringOwned(s) => RawValue::Text(s.to_string()),
            AnyValue::Boolean(b) => RawValue::Number(if b { 1.0 } else { 0.0 }),
            other => other
                .extract::<f64>()
                .map_or(RawValue::Missing, RawValue::Number),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed_before_parsing() {
        assert_eq!(RawValue::from(" 3.5 ").to_f64(), Some(3.5));
        assert_eq!(RawValue::from("1e3").to_f64(), Some(1000.0));
    }

    #[test]
    fn test_non_numeric_text_is_missing() {
        assert_eq!(RawValue::from("abc").to_f64(), None);
        assert_eq!(RawValue::from("").to_f64(), None);
        assert_eq!(RawValue::from("NaN").to_f64(), None);
        assert_eq!(RawValue::from("inf").to_f64(), None);
    }

    #[test]
    fn test_non_finite_numbers_are_missing() {
        assert_eq!(RawValue::Number(f64::NAN).to_f64(), None);
        assert_eq!(RawValue::Number(f64::NEG_INFINITY).to_f64(), None);
        assert_eq!(RawValue::from(None).to_f64(), None);
    }

    #[test]
    fn test_raw_values_from_mixed_columns() {
        let df = df! {
            "num" => [Some(1.0f64), None, Some(3.0)],
            "text" => ["4", "x", ""],
            "int" => [1i64, 2, 3],
        }
        .unwrap();

        let num = raw_values(df.column("num").unwrap());
        assert_eq!(
            num,
            vec![RawValue::Number(1.0), RawValue::Missing, RawValue::Number(3.0)]
        );

        let text = raw_values(df.column("text").unwrap());
        assert_eq!(text[0], RawValue::Text("4".to_string()));
        assert_eq!(text[1].to_f64(), None);

        let int = raw_values(df.column("int").unwrap());
        assert_eq!(int[2], RawValue::Number(3.0));
    }
}
