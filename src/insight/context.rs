//! Insight context and the fixed prompt sent to the language model

use serde::Serialize;

use crate::pipeline::CorrelationResult;

/// Caveat used when Data 1 and Data 2 are paired by row position
pub const DEFAULT_ALIGNMENT_NOTE: &str = "Assumption: Data 1 and Data 2 are aligned by row order. \
If the data has an ID or date column, merging by key is more reliable.";

/// Caveat used when the datasets were joined on key columns
pub fn key_join_note(keys: &[String]) -> String {
    format!(
        "Data 1 and Data 2 were matched by key column(s): {}. Rows without a match in both datasets were excluded.",
        keys.join(", ")
    )
}

/// Sentence appended to the note when rows were restricted by filters
pub fn filter_note(filters: &[String]) -> String {
    format!("Only rows with {} were analysed.", filters.join(", "))
}

/// Flat summary of one analysis run, passed verbatim into the prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightContext {
    pub method: String,
    /// Rounded to 3 decimal places
    pub coefficient: f64,
    /// Rounded to 4 decimal places
    pub p_value: f64,
    pub strength: String,
    pub status: String,
    pub n_valid: usize,
    pub n_missing: usize,
    pub note: String,
}

impl InsightContext {
    pub fn new(result: &CorrelationResult, note: impl Into<String>) -> Self {
        Self {
            method: "Pearson".to_string(),
            coefficient: round_to(result.coefficient, 3),
            p_value: round_to(result.p_value, 4),
            strength: result.strength.label().to_string(),
            status: result.significance.label().to_string(),
            n_valid: result.n_valid,
            n_missing: result.n_missing,
            note: note.into(),
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Build the prompt with its fixed output format.
///
/// The CONCLUSION section must state that correlation is not causation and
/// NEXT STEP asks for exactly one recommendation.
pub fn build_prompt(context: &InsightContext) -> String {
    format!(
        r#"You are a concise and clear statistical analyst.

Write a simple, professional insight using this format only:

CORRELATION RESULT
- Method: {method}
- Coefficient: {coefficient}
- P-value: {p_value}
- Strength: {strength}
- Status: {status}

DATA QUALITY
- Valid data points: {n_valid}
- Missing data: {n_missing}
- Note: {note}

CONCLUSION
Briefly explain whether there is statistical evidence of a relationship between Data 1 and Data 2.
State clearly that correlation does not imply causation.

NEXT STEP
Give exactly one recommendation for the most relevant next step (1 sentence).

Use clear and concise English."#,
        method = context.method,
        coefficient = context.coefficient,
        p_value = context.p_value,
        strength = context.strength,
        status = context.status,
        n_valid = context.n_valid,
        n_missing = context.n_missing,
        note = context.note,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(0.00004, 4), 0.0);
        assert_eq!(round_to(-0.98767, 4), -0.9877);
    }

    #[test]
    fn test_filter_note_lists_filters() {
        let note = filter_note(&["year=2020".to_string(), "disease=DBD".to_string()]);
        assert_eq!(note, "Only rows with year=2020, disease=DBD were analysed.");
    }

    #[test]
    fn test_key_join_note_lists_keys() {
        let note = key_join_note(&["year".to_string(), "region".to_string()]);
        assert!(note.contains("year, region"));
    }
}
