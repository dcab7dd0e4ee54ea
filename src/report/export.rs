//! Correlation result export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CleanedSample, CorrelationResult};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// Korelasi version
    pub korelasi_version: String,
    /// Data 1 file path
    pub data1_file: String,
    /// Data 2 file path (same as Data 1 for single-file analysis)
    pub data2_file: String,
    pub x_column: String,
    pub y_column: String,
    /// Key columns used for matching rows (empty when paired by position)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub join_keys: Vec<String>,
    /// Row filters applied before pairing, as `column=value`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    /// Data-quality note passed to the insight
    pub note: String,
}

/// A single cleaned data point
#[derive(Serialize)]
pub struct ExportPoint {
    pub x: f64,
    pub y: f64,
}

/// Complete correlation export with metadata
#[derive(Serialize)]
pub struct CorrelationExport<'a> {
    pub metadata: AnalysisMetadata,
    pub result: &'a CorrelationResult,
    pub total_rows: usize,
    pub missing_x: usize,
    pub missing_y: usize,
    pub points: Vec<ExportPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<&'a str>,
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub data1_file: &'a str,
    pub data2_file: &'a str,
    pub x_column: &'a str,
    pub y_column: &'a str,
    pub join_keys: &'a [String],
    pub filters: &'a [String],
    pub note: &'a str,
}

impl<'a> CorrelationExport<'a> {
    pub fn new(
        result: &'a CorrelationResult,
        sample: &CleanedSample,
        insight: Option<&'a str>,
        params: &ExportParams,
    ) -> Self {
        Self {
            metadata: AnalysisMetadata {
                timestamp: Utc::now().to_rfc3339(),
                korelasi_version: env!("CARGO_PKG_VERSION").to_string(),
                data1_file: params.data1_file.to_string(),
                data2_file: params.data2_file.to_string(),
                x_column: params.x_column.to_string(),
                y_column: params.y_column.to_string(),
                join_keys: params.join_keys.to_vec(),
                filters: params.filters.to_vec(),
                note: params.note.to_string(),
            },
            result,
            total_rows: sample.total_rows,
            missing_x: sample.missing_x,
            missing_y: sample.missing_y,
            points: sample
                .pairs
                .iter()
                .map(|&(x, y)| ExportPoint { x, y })
                .collect(),
            insight,
        }
    }
}

/// Export a correlation result to a JSON file
pub fn export_correlation(
    result: &CorrelationResult,
    sample: &CleanedSample,
    insight: Option<&str>,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = CorrelationExport::new(result, sample, insight, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize correlation result to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write export file: {}", output_path.display()))?;

    Ok(())
}
