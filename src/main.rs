//! Korelasi: Correlation Analysis CLI Tool
//!
//! Computes the Pearson correlation between a column of one dataset and a
//! column of another, and optionally asks a language model to summarize it.

use anyhow::Result;
use clap::Parser;

use korelasi::cli::{analyze, columns, Cli, Commands};
use korelasi::logging::{init_logging, LogConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ansi = console::Term::stderr().features().colors_supported();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(ansi));

    match &cli.command {
        Commands::Analyze(args) => analyze::run_analyze(args),
        Commands::Columns { input, sheet } => columns::run_columns(input, sheet.as_deref()),
    }
}
