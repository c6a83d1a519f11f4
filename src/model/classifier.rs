//! Classifier trait

use ndarray::{Array1, Array2};

use crate::error::Result;

/// Encoded label of the churn class.
pub const POSITIVE_CLASS: usize = 1;
/// Encoded label of the retained class.
pub const NEGATIVE_CLASS: usize = 0;

/// Binary classifier over schema-ordered feature rows.
///
/// Implementations are immutable after `fit`, so a fitted model can be shared
/// across request threads.
pub trait Classifier: Send + Sync {
    /// Fit on `features` (one row per sample) and encoded `targets`.
    fn fit(&mut self, features: &Array2<f64>, targets: &[usize]) -> Result<()>;

    /// Probability of [`POSITIVE_CLASS`] for each row.
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array1<f64>>;

    /// Decision threshold applied by [`predict`](Self::predict).
    fn threshold(&self) -> f64 {
        0.5
    }

    /// Hard class label for each row.
    fn predict(&self, features: &Array2<f64>) -> Result<Vec<usize>> {
        let threshold = self.threshold();
        Ok(self
            .predict_proba(features)?
            .iter()
            .map(|&p| if p >= threshold { POSITIVE_CLASS } else { NEGATIVE_CLASS })
            .collect())
    }

    /// Number of input columns the model expects, once fitted.
    fn n_features(&self) -> Option<usize>;
}
