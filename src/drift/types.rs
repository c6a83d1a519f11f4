//! Type definitions for drift detection.

use serde::{Deserialize, Serialize};

/// Multiple-comparison correction applied to the per-column significance level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correction {
    /// Every column is tested at the configured p-value
    #[default]
    None,
    /// The p-value is divided by the number of columns
    Bonferroni,
}

impl Correction {
    /// Per-column threshold for `columns` simultaneous tests.
    pub fn threshold(self, p_value: f64, columns: usize) -> f64 {
        match self {
            Correction::None => p_value,
            Correction::Bonferroni if columns > 0 => p_value / columns as f64,
            Correction::Bonferroni => p_value,
        }
    }
}

/// Outcome of the two-sample test for one feature column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnDrift {
    /// Feature name from the reference sample
    pub feature: String,
    /// KS statistic `D`
    pub statistic: f64,
    /// p-value of `D`: exact for small samples, asymptotic otherwise
    pub p_value: f64,
    /// Whether the p-value fell below the per-column threshold
    pub drifted: bool,
}

/// Per-request drift verdict.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriftReport {
    /// One entry per reference column, in reference order
    pub columns: Vec<ColumnDrift>,
    /// Number of drifted columns
    pub drifted_count: usize,
    /// Per-column threshold the p-values were compared against
    pub threshold: f64,
}

impl DriftReport {
    pub(crate) fn from_columns(columns: Vec<ColumnDrift>, threshold: f64) -> Self {
        let drifted_count = columns.iter().filter(|c| c.drifted).count();
        Self { columns, drifted_count, threshold }
    }

    /// Whether any column drifted.
    pub fn is_drift(&self) -> bool {
        self.drifted_count > 0
    }

    /// Drift flag per column, in reference order.
    pub fn per_column_is_drifted(&self) -> Vec<bool> {
        self.columns.iter().map(|c| c.drifted).collect()
    }

    /// Names of the drifted columns.
    pub fn drifted_features(&self) -> Vec<&str> {
        self.columns.iter().filter(|c| c.drifted).map(|c| c.feature.as_str()).collect()
    }

    /// Percentage of columns that drifted.
    pub fn drift_percentage(&self) -> f64 {
        if self.columns.is_empty() {
            0.0
        } else {
            100.0 * self.drifted_count as f64 / self.columns.len() as f64
        }
    }
}
