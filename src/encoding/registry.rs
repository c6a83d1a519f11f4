//! Column name → fitted encoder, produced once by training.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::encoder::{CategoricalEncoder, UnseenPolicy};
use crate::error::{ChurnError, Result};
use crate::features::{Cell, EngineeredRecord};

/// An engineered record with every category replaced by its code.
///
/// Columns keep the order they were produced in; reconciling them with the
/// trained schema is [`crate::assembly::FeatureSchema::assemble`]'s job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedRecord {
    values: Vec<(String, f64)>,
}

impl EncodedRecord {
    /// Build from arbitrary `(column, value)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self { values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }

    /// Value of `column`, if present.
    #[cfg(test)]
    pub(crate) fn get(&self, column: &str) -> Option<f64> {
        self.values.iter().find(|(name, _)| name == column).map(|(_, v)| *v)
    }

    /// Column names in production order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// `(column, value)` pairs in production order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, v)| (name.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fitted encoders for every categorical column, including the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderRegistry {
    target: String,
    encoders: BTreeMap<String, CategoricalEncoder>,
}

impl EncoderRegistry {
    /// Fit one encoder per categorical column observed in `records`.
    ///
    /// The target column is fitted too when the records are labelled, so its
    /// class order is persisted alongside the features.
    pub fn fit(target: &str, records: &[EngineeredRecord]) -> Self {
        let mut observed: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
        for record in records {
            for (column, cell) in record.cells() {
                if let Cell::Category(value) = cell {
                    observed.entry(column).or_default().push(value);
                }
            }
        }

        let encoders = observed
            .into_iter()
            .map(|(column, values)| {
                (column.to_string(), CategoricalEncoder::fit(column, values))
            })
            .collect();

        Self { target: target.to_string(), encoders }
    }

    /// Name of the target column.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Encoder for `column`.
    pub fn get(&self, column: &str) -> Option<&CategoricalEncoder> {
        self.encoders.get(column)
    }

    /// Iterate over `(column, encoder)` pairs in column-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoricalEncoder)> {
        self.encoders.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Check that `columns` and the target each have an encoder with at least one class.
    pub fn ensure_covers<'a>(&'a self, columns: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for column in columns.into_iter().chain(std::iter::once(self.target.as_str())) {
            match self.encoders.get(column) {
                Some(encoder) if !encoder.classes().is_empty() => {}
                _ => return Err(ChurnError::MissingEncoder { column: column.to_string() }),
            }
        }
        Ok(())
    }

    /// Encode every feature cell of `record`. The target cell is never encoded here.
    pub fn encode_features(
        &self,
        record: &EngineeredRecord,
        policy: UnseenPolicy,
    ) -> Result<EncodedRecord> {
        let cells = record.cells();
        let mut values = Vec::with_capacity(cells.len());
        for (column, cell) in cells {
            if column == self.target {
                continue;
            }
            let value = match cell {
                Cell::Number(v) => v,
                Cell::Category(text) => {
                    let encoder = self
                        .encoders
                        .get(column)
                        .ok_or_else(|| ChurnError::MissingEncoder { column: column.to_string() })?;
                    encoder.transform(text, policy)? as f64
                }
            };
            values.push((column.to_string(), value));
        }
        Ok(EncodedRecord { values })
    }

    /// Encode a target label strictly.
    pub fn encode_target(&self, label: &str) -> Result<usize> {
        self.encoders
            .get(&self.target)
            .ok_or_else(|| ChurnError::MissingEncoder { column: self.target.clone() })?
            .transform(label, UnseenPolicy::Reject)
    }
}
