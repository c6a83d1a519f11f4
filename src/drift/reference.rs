//! Frozen training-time sample used as the drift baseline.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};

#[derive(Deserialize)]
struct PersistedSample {
    columns: Vec<String>,
    data: Array2<f64>,
}

/// Row-per-observation reference matrix with one named column per feature.
///
/// Immutable once built: there are no mutating methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersistedSample")]
pub struct ReferenceSample {
    columns: Vec<String>,
    data: Array2<f64>,
}

impl TryFrom<PersistedSample> for ReferenceSample {
    type Error = ChurnError;

    fn try_from(persisted: PersistedSample) -> Result<Self> {
        Self::new(persisted.columns, persisted.data)
    }
}

impl ReferenceSample {
    /// Wrap `data`, requiring at least one row and one column per name.
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 || columns.is_empty() {
            return Err(ChurnError::EmptyReference);
        }
        if data.ncols() != columns.len() {
            return Err(ChurnError::DriftShape { expected: columns.len(), actual: data.ncols() });
        }
        Ok(Self { columns, data })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Values of column `idx`.
    pub fn column(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.data.column(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_empty_rows_rejected() {
        let err = ReferenceSample::new(vec!["a".into()], Array2::zeros((0, 1))).unwrap_err();
        assert!(matches!(err, ChurnError::EmptyReference));
    }

    #[test]
    fn test_width_must_match_names() {
        let err = ReferenceSample::new(vec!["a".into()], array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, ChurnError::DriftShape { expected: 1, actual: 2 }));
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let sample = ReferenceSample::new(vec!["a".into(), "b".into()], array![[1.0, 2.0], [3.0, 4.0]])
            .unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        let restored: ReferenceSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, restored);
        assert_eq!(restored.column(1).to_vec(), vec![2.0, 4.0]);

        let broken = json.replace(r#"["a","b"]"#, r#"["a"]"#);
        assert!(serde_json::from_str::<ReferenceSample>(&broken).is_err());
    }
}
