//! Reconcile encoded records with the trained feature schema.
//!
//! The classifier was trained on a fixed, ordered column list. Whatever a
//! request produces, the vector handed downstream has exactly those columns in
//! exactly that order:
//!
//! 1. schema columns absent from the record are filled with `0.0`
//! 2. record columns absent from the schema are dropped
//! 3. the remainder is laid out in schema order as `f64`

use std::collections::HashSet;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::encoding::EncodedRecord;
use crate::error::{ChurnError, Result};

/// Ordered column names the classifier was trained on. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = ChurnError;

    fn try_from(columns: Vec<String>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

/// What reconciliation had to do for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Schema columns the record did not provide
    pub filled: Vec<String>,
    /// Record columns the schema does not know
    pub dropped: Vec<String>,
}

impl AssemblyReport {
    /// Whether the record matched the schema's column set exactly.
    pub fn is_exact(&self) -> bool {
        self.filled.is_empty() && self.dropped.is_empty()
    }
}

/// A numeric feature vector in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Array1<f64>,
}

impl FeatureVector {
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// View as a one-row batch, the shape both the drift detector and the
    /// classifier consume.
    pub fn to_batch(&self) -> Array2<f64> {
        self.values.clone().insert_axis(ndarray::Axis(0))
    }
}

impl FeatureSchema {
    /// Validate and wrap a column list.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ChurnError::EmptySchema);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ChurnError::DuplicateColumn { column: column.clone() });
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `column` in the schema.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Assemble `record` into a schema-ordered vector.
    pub fn assemble(&self, record: &EncodedRecord) -> FeatureVector {
        self.assemble_with_report(record).0
    }

    /// Assemble and report which columns were filled or dropped.
    pub fn assemble_with_report(&self, record: &EncodedRecord) -> (FeatureVector, AssemblyReport) {
        let mut values = Array1::<f64>::zeros(self.columns.len());
        let mut provided = vec![false; self.columns.len()];
        let mut report = AssemblyReport::default();

        for (column, value) in record.iter() {
            match self.position(column) {
                Some(idx) => {
                    values[idx] = value;
                    provided[idx] = true;
                }
                None => report.dropped.push(column.to_string()),
            }
        }

        report.filled = self
            .columns
            .iter()
            .zip(&provided)
            .filter(|(_, seen)| !**seen)
            .map(|(c, _)| c.clone())
            .collect();

        (FeatureVector { values }, report)
    }

    /// Assemble many records into a row-per-record matrix.
    pub fn assemble_batch<'a>(&self, records: impl IntoIterator<Item = &'a EncodedRecord>) -> Array2<f64> {
        let rows: Vec<FeatureVector> = records.into_iter().map(|r| self.assemble(r)).collect();
        let mut batch = Array2::<f64>::zeros((rows.len(), self.columns.len()));
        for (mut row, vector) in batch.rows_mut().into_iter().zip(&rows) {
            row.assign(vector.values());
        }
        batch
    }
}
