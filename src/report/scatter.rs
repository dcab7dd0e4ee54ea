//! Terminal scatter preview of the cleaned sample with its regression line

use console::style;

use crate::pipeline::{CleanedSample, RegressionLine};

const POINT: char = '●';
const LINE: char = '·';

/// Character grid for a scatter plot. Row 0 is the top of the plot.
#[derive(Debug)]
pub struct ScatterPlot {
    pub width: usize,
    pub height: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    grid: Vec<Vec<char>>,
}

impl ScatterPlot {
    pub fn new(
        sample: &CleanedSample,
        regression: Option<&RegressionLine>,
        width: usize,
        height: usize,
    ) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        let x_range = padded_range(sample.xs());
        let y_range = padded_range(sample.ys());
        let mut grid = vec![vec![' '; width]; height];

        if let Some(line) = regression {
            for col in 0..width {
                let x = x_range.0 + (x_range.1 - x_range.0) * col as f64 / (width - 1) as f64;
                if let Some(row) = to_row(line.predict(x), y_range, height) {
                    grid[row][col] = LINE;
                }
            }
        }

        for (x, y) in &sample.pairs {
            let col = to_col(*x, x_range, width);
            if let Some(row) = to_row(*y, y_range, height) {
                grid[row][col] = POINT;
            }
        }

        Self {
            width,
            height,
            x_range,
            y_range,
            grid,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> char {
        self.grid[row][col]
    }

    pub fn point_count(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == POINT)
            .count()
    }

    /// Plot rows framed with axes, without styling.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height + 2);
        for (idx, row) in self.grid.iter().enumerate() {
            let label = if idx == 0 {
                format!("{:>10.2}", self.y_range.1)
            } else if idx == self.height - 1 {
                format!("{:>10.2}", self.y_range.0)
            } else {
                " ".repeat(10)
            };
            lines.push(format!("{} ┤{}", label, row.iter().collect::<String>()));
        }
        lines.push(format!("{} └{}", " ".repeat(10), "─".repeat(self.width)));
        let left = format!("{:.2}", self.x_range.0);
        let right = format!("{:.2}", self.x_range.1);
        let gap = (self.width + 1).saturating_sub(left.len() + right.len());
        lines.push(format!("{}  {}{}{}", " ".repeat(10), left, " ".repeat(gap), right));
        lines
    }

    pub fn display(&self, x_label: &str, y_label: &str) {
        println!();
        println!(
            "    {} {}",
            style("📈").cyan(),
            style("SCATTER PLOT (valid data)").white().bold()
        );
        println!(
            "    {}",
            style(format!("x: {}   y: {}   {} point   {} regression", x_label, y_label, POINT, LINE)).dim()
        );
        println!();
        for line in self.lines() {
            println!("  {}", line);
        }
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

fn to_col(x: f64, range: (f64, f64), width: usize) -> usize {
    let frac = (x - range.0) / (range.1 - range.0);
    ((frac * (width - 1) as f64).round() as usize).min(width - 1)
}

fn to_row(y: f64, range: (f64, f64), height: usize) -> Option<usize> {
    let frac = (y - range.0) / (range.1 - range.0);
    if !(0.0..=1.0).contains(&frac) {
        return None;
    }
    let from_bottom = (frac * (height - 1) as f64).round() as usize;
    Some(height - 1 - from_bottom.min(height - 1))
}
