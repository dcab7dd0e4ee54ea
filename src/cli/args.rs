//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::insight::DEFAULT_MODEL;
use crate::pipeline::RowFilter;

/// Korelasi - Pearson correlation between two dataset columns, with optional AI insight
#[derive(Parser, Debug)]
#[command(name = "korelasi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Correlate column X of Data 1 with column Y of Data 2
    Analyze(AnalyzeArgs),

    /// List the columns of a dataset
    Columns {
        /// Input file path (CSV, Parquet, or spreadsheet)
        input: PathBuf,

        /// Worksheet name for spreadsheet files (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Data 1 file path (CSV, Parquet, xlsx, xls, xlsb, or ods)
    #[arg(long = "data1")]
    pub data1: PathBuf,

    /// Data 2 file path. When omitted, Y is read from Data 1.
    #[arg(long = "data2")]
    pub data2: Option<PathBuf>,

    /// Column in Data 1 used as X
    #[arg(short = 'x', long)]
    pub x: String,

    /// Column in Data 2 used as Y
    #[arg(short = 'y', long)]
    pub y: String,

    /// Worksheet of Data 1 (spreadsheets only)
    #[arg(long)]
    pub sheet1: Option<String>,

    /// Worksheet of Data 2 (spreadsheets only)
    #[arg(long)]
    pub sheet2: Option<String>,

    /// Key column(s) used to match Data 1 and Data 2 rows (repeat or comma-separate).
    /// Without keys, rows are paired by position.
    #[arg(short = 'k', long = "key", value_delimiter = ',')]
    pub keys: Vec<String>,

    /// Keep only rows where COLUMN equals VALUE (repeatable, all must match).
    /// Applied to each dataset that has the column, before pairing.
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<RowFilter>,

    /// Override the data-quality note passed to the AI insight
    #[arg(long)]
    pub note: Option<String>,

    /// Request an AI-generated insight for the result
    #[arg(long, default_value = "false")]
    pub insight: bool,

    /// Gemini model used for the insight
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// TOML secrets file containing GEMINI_API_KEY.
    /// Defaults to <config dir>/korelasi/secrets.toml; the environment is checked after it.
    #[arg(long)]
    pub secrets: Option<PathBuf>,

    /// Write the result, cleaned sample and insight to a JSON file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Skip the scatter preview
    #[arg(long, default_value = "false")]
    pub no_plot: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl AnalyzeArgs {
    /// Path Y is read from: Data 2 when given, Data 1 otherwise.
    pub fn y_source(&self) -> &PathBuf {
        self.data2.as_ref().unwrap_or(&self.data1)
    }

    /// Sheet Y is read from, following the same fallback as [`Self::y_source`].
    pub fn y_sheet(&self) -> Option<&String> {
        if self.data2.is_some() {
            self.sheet2.as_ref()
        } else {
            self.sheet2.as_ref().or(self.sheet1.as_ref())
        }
    }
}
