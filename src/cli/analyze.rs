//! The `analyze` command: load, extract, correlate, report, and summarize

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use polars::prelude::DataFrame;

use crate::cli::args::AnalyzeArgs;
use crate::cli::prompts::confirm_generate_insight;
use crate::error::AnalysisError;
use crate::insight::{
    default_secrets_path, filter_note, generate_insight, key_join_note, resolve_api_key,
    GeminiClient, InsightContext, DEFAULT_ALIGNMENT_NOTE,
};
use crate::pipeline::{
    align_by_keys, check_filter_columns, column_values, extract_pairs, filter_rows,
    load_dataset, pearson, LoadOptions, RawValue,
};
use crate::report::{export_correlation, CorrelationSummary, ExportParams, ScatterPlot};
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_step_header, print_success, print_warning, ConfigCard,
};

const PLOT_WIDTH: usize = 60;
const PLOT_HEIGHT: usize = 16;

/// Turn a pipeline error into an anyhow error that leads with the user-facing message.
fn user_error(err: AnalysisError) -> anyhow::Error {
    let message = err.user_message().to_string();
    anyhow::Error::new(err).context(message)
}

fn load(path: &Path, sheet: Option<&String>, infer_schema_length: usize) -> Result<DataFrame> {
    let options = LoadOptions {
        infer_schema_length,
        sheet: sheet.cloned(),
    };
    load_dataset(path, &options)
}

/// Run a full correlation analysis
pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let insight_model = args.insight.then_some(args.model.as_str());

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&ConfigCard {
        data1: &args.data1,
        data2: args.y_source(),
        x_column: &args.x,
        y_column: &args.y,
        keys: &args.keys,
        insight_model,
    });

    // Step 1: Load datasets
    print_step_header(1, "Load Data");
    let spinner = create_spinner("Reading Data 1...");
    let df1 = load(&args.data1, args.sheet1.as_ref(), args.infer_schema_length)?;
    finish_with_success(
        &spinner,
        &format!("Data 1: {} rows × {} columns", df1.height(), df1.width()),
    );

    let df2 = match &args.data2 {
        Some(path) => {
            let spinner = create_spinner("Reading Data 2...");
            let df = load(path, args.y_sheet(), args.infer_schema_length)?;
            finish_with_success(
                &spinner,
                &format!("Data 2: {} rows × {} columns", df.height(), df.width()),
            );
            Some(df)
        }
        None => {
            print_info("Data 2 not given, reading Y from Data 1");
            None
        }
    };

    let (df1, df2) = apply_filters(args, df1, df2)?;
    let df2_ref = df2.as_ref().unwrap_or(&df1);

    // Step 2: Align and clean
    print_step_header(2, "Clean Data");
    let (raw_x, raw_y): (Vec<RawValue>, Vec<RawValue>) = if args.keys.is_empty() {
        (column_values(&df1, &args.x)?, column_values(df2_ref, &args.y)?)
    } else {
        align_by_keys(&df1, &args.x, df2_ref, &args.y, &args.keys)?
    };

    let sample = extract_pairs(&raw_x, &raw_y).map_err(user_error)?;
    print_success(&format!(
        "{} valid pair(s) kept, {} row(s) dropped",
        sample.len(),
        sample.dropped_rows()
    ));

    // Step 3: Correlation
    print_step_header(3, "Pearson Correlation");
    let result = pearson(&sample).map_err(user_error)?;
    tracing::info!(
        coefficient = result.coefficient,
        p_value = result.p_value,
        n_valid = result.n_valid,
        "Correlation computed"
    );

    let summary = CorrelationSummary::new(&args.x, &args.y, &result, &sample);
    summary.display();

    if !args.no_plot {
        ScatterPlot::new(&sample, Some(&result.regression), PLOT_WIDTH, PLOT_HEIGHT)
            .display(&args.x, &args.y);
    }

    let filters = filter_labels(args);
    let note = match &args.note {
        Some(note) => note.clone(),
        None => {
            let pairing = if args.keys.is_empty() {
                DEFAULT_ALIGNMENT_NOTE.to_string()
            } else {
                key_join_note(&args.keys)
            };
            if filters.is_empty() {
                pairing
            } else {
                format!("{} {}", pairing, filter_note(&filters))
            }
        }
    };

    // Step 4: AI insight
    let mut insight: Option<String> = None;
    if args.insight {
        print_step_header(4, "AI Insight");
        insight = run_insight(args, &InsightContext::new(&result, note.clone()))?;
    }

    if let Some(path) = &args.export {
        let data1 = args.data1.display().to_string();
        let data2 = args.y_source().display().to_string();
        export_correlation(
            &result,
            &sample,
            insight.as_deref(),
            path,
            &ExportParams {
                data1_file: &data1,
                data2_file: &data2,
                x_column: &args.x,
                y_column: &args.y,
                join_keys: &args.keys,
                filters: &filters,
                note: &note,
            },
        )?;
        print_success(&format!("Exported results to {}", path.display()));
    }

    print_completion();
    Ok(())
}

/// Restrict both datasets to the rows matching `--filter`.
fn apply_filters(
    args: &AnalyzeArgs,
    df1: DataFrame,
    df2: Option<DataFrame>,
) -> Result<(DataFrame, Option<DataFrame>)> {
    if args.filters.is_empty() {
        return Ok((df1, df2));
    }

    let frames: Vec<&DataFrame> = std::iter::once(&df1).chain(df2.as_ref()).collect();
    check_filter_columns(&args.filters, &frames)?;

    let df1 = filter_rows(&df1, &args.filters)?;
    let df2 = df2
        .map(|df| filter_rows(&df, &args.filters))
        .transpose()?;

    let mut counts = format!("{} row(s) in Data 1", df1.height());
    if let Some(df) = &df2 {
        counts.push_str(&format!(", {} row(s) in Data 2", df.height()));
    }
    print_info(&format!(
        "Filtered by {}: {}",
        filter_labels(args).join(", "),
        counts
    ));

    Ok((df1, df2))
}

fn filter_labels(args: &AnalyzeArgs) -> Vec<String> {
    args.filters.iter().map(|f| f.to_string()).collect()
}

/// Ask the model for an insight. Generation failures are shown, not fatal.
fn run_insight(args: &AnalyzeArgs, context: &InsightContext) -> Result<Option<String>> {
    let secrets = args.secrets.clone().or_else(default_secrets_path);
    let Some(key) = resolve_api_key(secrets.as_deref()) else {
        let warning = generate_insight(None, context).map_err(user_error)?;
        print_warning(&warning);
        return Ok(None);
    };

    let client = GeminiClient::new(key, &args.model)
        .map_err(user_error)
        .context("Failed to create AI client")?;

    if !args.no_confirm && !confirm_generate_insight(client.model())? {
        print_info("AI insight skipped");
        return Ok(None);
    }

    let spinner = create_spinner(&format!("{} is analysing...", client.model()));
    match generate_insight(Some(&client), context) {
        Ok(text) => {
            finish_with_success(&spinner, "Insight generated");
            println!();
            for line in text.lines() {
                println!("    {}", line);
            }
            Ok(Some(text))
        }
        Err(e) => {
            finish_with_warning(&spinner, "Insight failed");
            print_warning(e.user_message());
            println!("    {}", style(e.to_string()).dim());
            Ok(None)
        }
    }
}
