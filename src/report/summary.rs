//! Correlation summary report

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CleanedSample, CorrelationResult};

/// Everything the terminal summary shows about one analysis run
#[derive(Debug)]
pub struct CorrelationSummary<'a> {
    pub x_column: &'a str,
    pub y_column: &'a str,
    pub result: &'a CorrelationResult,
    pub sample: &'a CleanedSample,
}

impl<'a> CorrelationSummary<'a> {
    pub fn new(
        x_column: &'a str,
        y_column: &'a str,
        result: &'a CorrelationResult,
        sample: &'a CleanedSample,
    ) -> Self {
        Self {
            x_column,
            y_column,
            result,
            sample,
        }
    }

    /// Status line shown under the metrics
    pub fn status_text(&self) -> String {
        if self.result.significance.is_significant() {
            format!("✅ {}", self.result.significance)
        } else {
            format!("⚠️  {}", self.result.significance)
        }
    }

    /// Rows-used line, e.g. "Valid data used: 3 of 5 rows. Missing/invalid total: 2"
    pub fn coverage_text(&self) -> String {
        format!(
            "Valid data used: {} of {} rows. Missing/invalid total: {}",
            self.result.n_valid,
            self.sample.total_rows,
            self.result.n_missing
        )
    }

    pub fn render_table(&self) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📈 Coefficient (r)"),
            Cell::new(format!("{:.3}", self.result.coefficient)).add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("🎲 P-value"),
            Cell::new(format!("{:.4}", self.result.p_value)),
        ]);

        let strength_color = match self.result.coefficient.abs() {
            r if r >= 0.5 => Color::Green,
            r if r >= 0.3 => Color::Yellow,
            _ => Color::Cyan,
        };
        table.add_row(vec![
            Cell::new("💪 Strength"),
            Cell::new(self.result.strength.label()).fg(strength_color),
        ]);

        table.add_row(vec![
            Cell::new("✅ Status"),
            Cell::new(self.result.significance.label()).fg(
                if self.result.significance.is_significant() {
                    Color::Green
                } else {
                    Color::Yellow
                },
            ),
        ]);

        table.add_row(vec![
            Cell::new("📁 Valid Pairs"),
            Cell::new(format!("{} / {}", self.result.n_valid, self.sample.total_rows)),
        ]);

        table.add_row(vec![
            Cell::new("🗑️  Missing/Invalid"),
            Cell::new(self.result.n_missing).fg(if self.result.n_missing == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        table.add_row(vec![
            Cell::new("📐 Regression"),
            Cell::new(format!(
                "y = {:.4}x {} {:.4}",
                self.result.regression.slope,
                if self.result.regression.intercept < 0.0 { "-" } else { "+" },
                self.result.regression.intercept.abs()
            )),
        ]);

        table.to_string()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📊").cyan(),
            style("CORRELATION SUMMARY").white().bold()
        );
        println!(
            "    {}",
            style(format!("{} vs {}", self.x_column, self.y_column)).dim()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.render_table().lines() {
            println!("    {}", line);
        }

        println!();
        println!("    Status: {}", self.status_text());
        println!("    {}", style(self.coverage_text()).dim());
    }
}
