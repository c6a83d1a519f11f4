//! L2-regularised logistic regression trained by batch gradient descent.
//!
//! Inputs are standardised with the training mean and standard deviation, which
//! are persisted with the weights so serving applies the identical scaling.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, POSITIVE_CLASS};
use crate::error::{ChurnError, Result};

/// Hyperparameters for [`LogisticRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
    pub threshold: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self { learning_rate: 0.1, epochs: 500, l2: 1e-4, threshold: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedState {
    weights: Array1<f64>,
    bias: f64,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

/// Logistic regression binary classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    params: LogisticParams,
    state: Option<FittedState>,
}

impl LogisticRegression {
    pub fn new(params: LogisticParams) -> Self {
        Self { params, state: None }
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }

    /// Binary cross-entropy of the fitted model on `features`/`targets`.
    pub fn log_loss(&self, features: &Array2<f64>, targets: &[usize]) -> Result<f64> {
        let proba = self.predict_proba(features)?;
        if proba.is_empty() {
            return Ok(0.0);
        }
        let eps = 1e-12;
        let total: f64 = proba
            .iter()
            .zip(targets)
            .map(|(&p, &t)| {
                let p = p.clamp(eps, 1.0 - eps);
                if t == POSITIVE_CLASS {
                    -p.ln()
                } else {
                    -(1.0 - p).ln()
                }
            })
            .sum();
        Ok(total / proba.len() as f64)
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(LogisticParams::default())
    }
}

fn sigmoid(v: f64) -> f64 {
    if v >= 0.0 {
        1.0 / (1.0 + (-v).exp())
    } else {
        let exp_v = v.exp();
        exp_v / (1.0 + exp_v)
    }
}

impl FittedState {
    fn standardise(&self, features: &Array2<f64>) -> Array2<f64> {
        (features - &self.mean) / &self.scale
    }

    fn logits(&self, standardised: &Array2<f64>) -> Array1<f64> {
        standardised.dot(&self.weights) + self.bias
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &Array2<f64>, targets: &[usize]) -> Result<()> {
        let (n, d) = features.dim();
        if n == 0 || d == 0 {
            return Err(ChurnError::InsufficientData {
                message: format!("cannot fit on a {n}x{d} matrix"),
            });
        }
        if targets.len() != n {
            return Err(ChurnError::Training {
                message: format!("{n} feature rows but {} targets", targets.len()),
            });
        }
        if targets.iter().all(|&t| t == targets[0]) {
            return Err(ChurnError::InsufficientData {
                message: "training targets contain a single class".to_string(),
            });
        }

        let mean = features.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(d));
        let scale = features.std_axis(Axis(0), 0.0).mapv(|s| if s > 1e-12 { s } else { 1.0 });
        let mut state = FittedState { weights: Array1::zeros(d), bias: 0.0, mean, scale };

        let x = state.standardise(features);
        let y: Array1<f64> =
            targets.iter().map(|&t| if t == POSITIVE_CLASS { 1.0 } else { 0.0 }).collect();
        let n_f = n as f64;
        let LogisticParams { learning_rate, epochs, l2, .. } = self.params;

        for epoch in 0..epochs {
            let residual = state.logits(&x).mapv(sigmoid) - &y;
            let grad_w = x.t().dot(&residual) / n_f + &state.weights * l2;
            let grad_b = residual.sum() / n_f;
            state.weights.scaled_add(-learning_rate, &grad_w);
            state.bias -= learning_rate * grad_b;

            if !state.bias.is_finite() {
                return Err(ChurnError::Training {
                    message: format!(
                        "gradient descent diverged at epoch {epoch}; lower learning_rate"
                    ),
                });
            }
        }

        tracing::debug!(rows = n, columns = d, epochs, "logistic regression fitted");
        self.state = Some(state);
        Ok(())
    }

    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        let state = self.state.as_ref().ok_or_else(|| ChurnError::Training {
            message: "model is not fitted".to_string(),
        })?;
        if features.ncols() != state.weights.len() {
            return Err(ChurnError::SchemaMismatch {
                expected: state.weights.len(),
                actual: features.ncols(),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(ChurnError::Training {
                message: "cannot score a row with NaN or infinite features".to_string(),
            });
        }
        Ok(state.logits(&state.standardise(features)).mapv(sigmoid))
    }

    fn threshold(&self) -> f64 {
        self.params.threshold
    }

    fn n_features(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.weights.len())
    }
}
