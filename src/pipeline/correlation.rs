//! Pearson correlation with significance testing

use std::fmt;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::AnalysisError;
use crate::pipeline::extract::CleanedSample;

/// Significance level for the two-sided test
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Qualitative bucket for |r|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    #[serde(rename = "Very Weak")]
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    #[serde(rename = "Very Strong")]
    VeryStrong,
}

impl Strength {
    /// Classify a coefficient. Each threshold is exclusive on the upper side,
    /// so |r| = 0.10 is Weak and |r| = 0.70 is Very Strong.
    pub fn from_coefficient(r: f64) -> Self {
        let ar = r.abs();
        if ar < 0.10 {
            Strength::VeryWeak
        } else if ar < 0.30 {
            Strength::Weak
        } else if ar < 0.50 {
            Strength::Moderate
        } else if ar < 0.70 {
            Strength::Strong
        } else {
            Strength::VeryStrong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::VeryWeak => "Very Weak",
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
            Strength::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Significance {
    Significant,
    #[serde(rename = "Not Significant")]
    NotSignificant,
}

impl Significance {
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < SIGNIFICANCE_LEVEL {
            Significance::Significant
        } else {
            Significance::NotSignificant
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Significance::Significant => "Significant",
            Significance::NotSignificant => "Not Significant",
        }
    }

    pub fn is_significant(&self) -> bool {
        matches!(self, Significance::Significant)
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Least-squares line `y = slope * x + intercept` for the scatter plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Outcome of a Pearson analysis on one cleaned sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub coefficient: f64,
    pub p_value: f64,
    pub strength: Strength,
    pub significance: Significance,
    pub n_valid: usize,
    pub n_missing: usize,
    pub regression: RegressionLine,
}

/// Compute the Pearson coefficient and its two-sided p-value.
///
/// Each column is divided by its largest magnitude, then accumulated in a
/// single Welford pass. This keeps the sums of squares finite and non-zero for
/// any finite input. The p-value comes from Student's t with `n - 2` degrees
/// of freedom.
///
/// # Errors
/// * `InsufficientData` - fewer than 2 pairs
/// * `DegenerateInput` - X or Y has zero variance
pub fn pearson(sample: &CleanedSample) -> Result<CorrelationResult, AnalysisError> {
    let n = sample.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData { valid: n });
    }

    let scale_x = max_magnitude(sample.xs());
    let scale_y = max_magnitude(sample.ys());
    if scale_x == 0.0 {
        return Err(AnalysisError::DegenerateInput { column: "X" });
    }
    if scale_y == 0.0 {
        return Err(AnalysisError::DegenerateInput { column: "Y" });
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut co_xy = 0.0;

    for (x, y) in sample.xs().zip(sample.ys()) {
        let x = x / scale_x;
        let y = y / scale_y;
        count += 1.0;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        m2_x += dx * (x - mean_x);
        m2_y += dy * (y - mean_y);
        co_xy += dx * (y - mean_y);
    }

    if m2_x <= 0.0 {
        return Err(AnalysisError::DegenerateInput { column: "X" });
    }
    if m2_y <= 0.0 {
        return Err(AnalysisError::DegenerateInput { column: "Y" });
    }

    let coefficient = (co_xy / (m2_x.sqrt() * m2_y.sqrt())).clamp(-1.0, 1.0);
    let p_value = two_sided_p_value(coefficient, n);

    // Back to original units
    let slope = (co_xy / m2_x) * (scale_y / scale_x);
    let intercept = mean_y * scale_y - slope * (mean_x * scale_x);

    Ok(CorrelationResult {
        coefficient,
        p_value,
        strength: Strength::from_coefficient(coefficient),
        significance: Significance::from_p_value(p_value),
        n_valid: n,
        n_missing: sample.n_missing(),
        regression: RegressionLine { slope, intercept },
    })
}

fn max_magnitude(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc: f64, v| acc.max(v.abs()))
}

/// Two-sided p-value for H0: no linear association.
fn two_sided_p_value(r: f64, n: usize) -> f64 {
    // Two points always lie on a line; the test has no degrees of freedom.
    if n <= 2 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return 0.0;
    }

    let t = r * (df / denom).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}
