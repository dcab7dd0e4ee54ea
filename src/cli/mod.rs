//! CLI module - argument parsing, commands and interactive prompts

pub mod analyze;
mod args;
pub mod columns;
mod prompts;

pub use args::{AnalyzeArgs, Cli, Commands};
pub use prompts::*;
