//! SMOTE oversampling of minority classes.
//!
//! Each synthetic row lies on the segment between a minority row and one of its
//! `k` nearest same-class neighbours (Euclidean), at a uniform random position.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ChurnError, Result};

/// SMOTE parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smote {
    pub k_neighbors: usize,
    pub seed: u64,
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Indices (into `rows`) of the `k` nearest neighbours of each row, self excluded.
fn nearest_neighbours(features: &Array2<f64>, rows: &[usize], k: usize) -> Vec<Vec<usize>> {
    rows.iter()
        .map(|&i| {
            let mut distances: Vec<(f64, usize)> = rows
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| (squared_distance(features.row(i), features.row(j)), j))
                .collect();
            distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            distances.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}

impl Smote {
    pub fn new(k_neighbors: usize, seed: u64) -> Self {
        Self { k_neighbors, seed }
    }

    /// Oversample every class up to the majority count.
    ///
    /// Original rows come first, in their original order, followed by the
    /// synthetic rows.
    pub fn fit_resample(
        &self,
        features: &Array2<f64>,
        targets: &[usize],
    ) -> Result<(Array2<f64>, Vec<usize>)> {
        if features.nrows() != targets.len() {
            return Err(ChurnError::Training {
                message: format!("{} rows but {} targets", features.nrows(), targets.len()),
            });
        }
        if self.k_neighbors == 0 {
            return Err(ChurnError::ConfigValue {
                field: "balance.k_neighbors".into(),
                message: "must be at least 1".into(),
            });
        }

        let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, &label) in targets.iter().enumerate() {
            by_class.entry(label).or_default().push(idx);
        }
        let majority = by_class.values().map(Vec::len).max().unwrap_or(0);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut synthetic_rows: Vec<f64> = Vec::new();
        let mut synthetic_targets = Vec::new();

        for (&label, rows) in &by_class {
            let needed = majority - rows.len();
            if needed == 0 {
                continue;
            }
            if rows.len() < 2 {
                return Err(ChurnError::InsufficientData {
                    message: format!("class {label} has {} row(s); SMOTE needs at least 2", rows.len()),
                });
            }
            let k = self.k_neighbors.min(rows.len() - 1);
            let neighbours = nearest_neighbours(features, rows, k);

            for _ in 0..needed {
                let pick = rng.random_range(0..rows.len());
                let base = features.row(rows[pick]);
                let other = features.row(neighbours[pick][rng.random_range(0..k)]);
                let gap: f64 = rng.random::<f64>();
                synthetic_rows.extend(base.iter().zip(other.iter()).map(|(b, o)| b + gap * (o - b)));
                synthetic_targets.push(label);
            }
            tracing::debug!(class = label, original = rows.len(), synthesized = needed, k, "SMOTE");
        }

        let synthetic = Array2::from_shape_vec((synthetic_targets.len(), features.ncols()), synthetic_rows)
            .map_err(|e| ChurnError::Training { message: e.to_string() })?;
        let resampled = ndarray::concatenate(Axis(0), &[features.view(), synthetic.view()])
            .map_err(|e| ChurnError::Training { message: e.to_string() })?;

        let mut labels = targets.to_vec();
        labels.extend(synthetic_targets);
        Ok((resampled, labels))
    }
}
