//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static COLUMN: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static ROBOT: Emoji<'_, '_> = Emoji("🤖 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("r").magenta().bold(),
        style("KORELASI").cyan().bold()
    );
    println!("    {}", style("Correlation analysis with AI insight").dim());
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Inputs shown in the configuration card
pub struct ConfigCard<'a> {
    pub data1: &'a Path,
    pub data2: &'a Path,
    pub x_column: &'a str,
    pub y_column: &'a str,
    pub keys: &'a [String],
    pub insight_model: Option<&'a str>,
}

/// Print configuration card
pub fn print_config(card: &ConfigCard) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Data 1: {:<39}│",
        FOLDER,
        truncate_path(card.data1, 38)
    );
    println!(
        "    │  {} Data 2: {:<39}│",
        FOLDER,
        truncate_path(card.data2, 38)
    );
    println!(
        "    │  {} X:      {:<39}│",
        COLUMN,
        truncate_string(card.x_column, 38)
    );
    println!(
        "    │  {} Y:      {:<39}│",
        COLUMN,
        truncate_string(card.y_column, 38)
    );
    println!("    ├{}┤", line);
    let pairing = if card.keys.is_empty() {
        "row order".to_string()
    } else {
        format!("keys: {}", card.keys.join(", "))
    };
    println!(
        "    │  {} Pairing: {:<38}│",
        LINK,
        truncate_string(&pairing, 37)
    );
    println!(
        "    │  {} Insight: {:<38}│",
        ROBOT,
        truncate_string(card.insight_model.unwrap_or("off"), 37)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Korelasi analysis complete!").green().bold()
    );
    println!();
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("abcdefghijkl", 8), "...hijkl");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("ééééééééé", 6), "...ééé");
    }
}
