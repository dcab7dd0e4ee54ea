//! The `columns` command: list the columns of a dataset

use std::path::Path;

use anyhow::Result;
use console::style;

use crate::pipeline::{get_column_names, LoadOptions};

pub fn run_columns(input: &Path, sheet: Option<&str>) -> Result<()> {
    let options = LoadOptions {
        sheet: sheet.map(str::to_string),
        ..Default::default()
    };
    let columns = get_column_names(input, &options)?;

    println!(
        "\n {} {} column(s) in {}",
        style("◆").cyan().bold(),
        style(columns.len()).yellow(),
        style(input.display()).dim()
    );
    for name in &columns {
        println!("   {} {}", style("•").dim(), name);
    }
    println!();

    Ok(())
}
