//! Insight module - natural-language summaries of a correlation result

pub mod client;
pub mod context;
pub mod credentials;

pub use client::*;
pub use context::*;
pub use credentials::*;

use crate::error::AnalysisError;

/// Returned instead of an insight when no API key is configured
pub const NO_CREDENTIAL_WARNING: &str = "⚠️ AI insight is not active (API key is not set).";

/// Ask the generator for a summary of `context`.
///
/// With no generator this returns [`NO_CREDENTIAL_WARNING`] and makes no call.
/// Remote failures propagate as `GenerationFailed`.
pub fn generate_insight(
    generator: Option<&dyn TextGenerator>,
    context: &InsightContext,
) -> Result<String, AnalysisError> {
    let Some(generator) = generator else {
        tracing::info!("No API key configured, skipping AI insight");
        return Ok(NO_CREDENTIAL_WARNING.to_string());
    };

    let prompt = build_prompt(context);
    let response = generator.generate(&prompt)?;
    Ok(response.trim().to_string())
}
