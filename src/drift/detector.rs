//! Per-column Kolmogorov-Smirnov drift detector.

use ndarray::{Array2, ArrayView1};

use super::reference::ReferenceSample;
use super::statistical::{ks_statistic, ks_two_sample_p_value, sorted_column};
use super::types::{ColumnDrift, Correction, DriftReport};
use crate::error::{ChurnError, Result};

/// Default significance level for the per-column test.
pub const DEFAULT_P_VALUE: f64 = 0.05;

/// Compares live observations against a frozen [`ReferenceSample`].
///
/// The sorted reference columns are computed once at construction; `evaluate`
/// only reads them, so one detector can be shared across request threads.
#[derive(Debug, Clone)]
pub struct KsDriftDetector {
    features: Vec<String>,
    sorted_reference: Vec<Vec<f64>>,
    p_value: f64,
    correction: Correction,
}

impl KsDriftDetector {
    /// Build a detector at significance level `p_value`.
    pub fn new(reference: &ReferenceSample, p_value: f64) -> Result<Self> {
        if !(p_value > 0.0 && p_value < 1.0) {
            return Err(ChurnError::ConfigValue {
                field: "p_value".to_string(),
                message: format!("must lie in (0, 1), got {p_value}"),
            });
        }
        let sorted_reference = (0..reference.n_columns())
            .map(|idx| sorted_column(reference.column(idx).iter().copied()))
            .collect();
        Ok(Self {
            features: reference.columns().to_vec(),
            sorted_reference,
            p_value,
            correction: Correction::None,
        })
    }

    /// Apply a multiple-comparison correction.
    pub fn with_correction(mut self, correction: Correction) -> Self {
        self.correction = correction;
        self
    }

    /// Feature names, in reference order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Per-column threshold after correction.
    pub fn threshold(&self) -> f64 {
        self.correction.threshold(self.p_value, self.features.len())
    }

    /// Test every column of `batch` (rows are observations) against the reference.
    pub fn evaluate(&self, batch: &Array2<f64>) -> Result<DriftReport> {
        if batch.ncols() != self.features.len() {
            return Err(ChurnError::DriftShape {
                expected: self.features.len(),
                actual: batch.ncols(),
            });
        }
        if batch.nrows() == 0 {
            return Err(ChurnError::InsufficientData {
                message: "drift check needs at least one observation".to_string(),
            });
        }

        // Sorting drops NaN; a non-finite observation would otherwise pass as "no drift".
        for (feature, column) in self.features.iter().zip(batch.columns()) {
            if column.iter().any(|v| !v.is_finite()) {
                return Err(ChurnError::NonFiniteFeature { column: feature.clone() });
            }
        }

        let threshold = self.threshold();
        let columns = self
            .features
            .iter()
            .zip(&self.sorted_reference)
            .zip(batch.columns())
            .map(|((feature, reference), current)| {
                Self::test_column(feature, reference, current, threshold)
            })
            .collect();

        Ok(DriftReport::from_columns(columns, threshold))
    }

    /// Test a single observation.
    pub fn evaluate_vector(&self, vector: ArrayView1<'_, f64>) -> Result<DriftReport> {
        let batch = vector.to_owned().insert_axis(ndarray::Axis(0));
        self.evaluate(&batch)
    }

    fn test_column(
        feature: &str,
        reference: &[f64],
        current: ArrayView1<'_, f64>,
        threshold: f64,
    ) -> ColumnDrift {
        let current = sorted_column(current.iter().copied());
        let statistic = ks_statistic(reference, &current);
        let p_value = ks_two_sample_p_value(statistic, reference.len(), current.len());
        ColumnDrift { feature: feature.to_string(), statistic, p_value, drifted: p_value < threshold }
    }
}
