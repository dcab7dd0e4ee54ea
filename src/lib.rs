//! Korelasi: Correlation Analysis Library
//!
//! Aligns two dataset columns into numeric pairs, computes the Pearson
//! correlation with its significance, and asks a language model for a
//! plain-language summary of the result.

pub mod cli;
pub mod error;
pub mod insight;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::AnalysisError;
