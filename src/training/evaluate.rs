//! Binary classification metrics for the held-out split.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};
use crate::model::{NEGATIVE_CLASS, POSITIVE_CLASS};

/// 2x2 confusion matrix with the churn class as positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl ConfusionMatrix {
    /// Count outcomes of `y_pred` against `y_true`.
    pub fn from_predictions(y_pred: &[usize], y_true: &[usize]) -> Result<Self> {
        if y_pred.len() != y_true.len() {
            return Err(ChurnError::Training {
                message: format!("{} predictions for {} targets", y_pred.len(), y_true.len()),
            });
        }
        let mut cm = Self::default();
        for (&pred, &truth) in y_pred.iter().zip(y_true) {
            match (truth == POSITIVE_CLASS, pred == POSITIVE_CLASS) {
                (true, true) => cm.true_positives += 1,
                (false, true) => cm.false_positives += 1,
                (true, false) => cm.false_negatives += 1,
                (false, false) => cm.true_negatives += 1,
            }
        }
        Ok(cm)
    }

    /// Total number of samples
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall; zero when both are zero.
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confusion Matrix:")?;
        writeln!(f, "        Pred {NEGATIVE_CLASS} Pred {POSITIVE_CLASS}")?;
        writeln!(f, "True {NEGATIVE_CLASS}{:>7}{:>7}", self.true_negatives, self.false_positives)?;
        writeln!(f, "True {POSITIVE_CLASS}{:>7}{:>7}", self.false_negatives, self.true_positives)
    }
}

/// Scores reported at the end of training and stored in the manifest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassificationMetrics {
    pub fn from_predictions(y_pred: &[usize], y_true: &[usize]) -> Result<Self> {
        let confusion = ConfusionMatrix::from_predictions(y_pred, y_true)?;
        Ok(Self {
            accuracy: confusion.accuracy(),
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1(),
            confusion,
        })
    }
}
