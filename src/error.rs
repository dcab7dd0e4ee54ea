//! Error types for the correlation and insight pipeline.
//!
//! Every stage of an analysis run returns one of these variants so the
//! presentation layer can show a descriptive message instead of relying on
//! a catch-all.

use thiserror::Error;

/// Errors that can occur while extracting, correlating, or summarizing data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The two selected columns do not have the same number of rows.
    ///
    /// Raised before any coercion happens; nothing is partially processed.
    #[error("column lengths differ: Data 1 has {left} rows, Data 2 has {right} rows")]
    ShapeMismatch {
        /// Row count of the X column
        left: usize,
        /// Row count of the Y column
        right: usize,
    },

    /// Fewer than two aligned numeric pairs survived cleaning.
    #[error("only {valid} valid pair(s) after removing missing or invalid values (minimum 2)")]
    InsufficientData {
        /// Number of pairs that survived cleaning
        valid: usize,
    },

    /// One of the columns has zero variance, so the coefficient is undefined.
    #[error("column {column} has zero variance; correlation is undefined")]
    DegenerateInput {
        /// Which side is constant ("X" or "Y")
        column: &'static str,
    },

    /// The remote text-generation call failed.
    #[error("text generation failed: {0}")]
    GenerationFailed(String),
}

impl AnalysisError {
    /// Returns a user-friendly message suitable for display in the terminal.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::ShapeMismatch { .. } => {
                "Data 1 and Data 2 have a different number of rows. Make sure both datasets line up row by row."
            }
            Self::InsufficientData { .. } => {
                "Too few rows left to analyse after removing empty or invalid values (at least 2 are needed)."
            }
            Self::DegenerateInput { .. } => {
                "One of the columns has the same value in every row, so correlation cannot be computed."
            }
            Self::GenerationFailed(_) => {
                "The AI service could not generate an insight. Please try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = AnalysisError::ShapeMismatch { left: 5, right: 4 };
        assert_eq!(
            err.to_string(),
            "column lengths differ: Data 1 has 5 rows, Data 2 has 4 rows"
        );
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let errors = [
            AnalysisError::ShapeMismatch { left: 1, right: 2 },
            AnalysisError::InsufficientData { valid: 1 },
            AnalysisError::DegenerateInput { column: "X" },
            AnalysisError::GenerationFailed("timeout".to_string()),
        ];
        let messages: std::collections::HashSet<&str> =
            errors.iter().map(|e| e.user_message()).collect();
        assert_eq!(messages.len(), errors.len());
    }
}
