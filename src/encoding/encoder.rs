//! Label encoder for one categorical column.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};

/// What to do with a category the encoder was not fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnseenPolicy {
    /// Fail with [`ChurnError::UnseenCategory`]. Used by the training passes.
    Reject,
    /// Substitute the first fitted class (index 0). Used at serving time.
    ///
    /// This trades precision for availability: the request is always answered,
    /// but an unknown category is scored as if it were the smallest known one.
    FallbackToFirst,
}

/// Fitted category → integer mapping for a single column. Immutable once fitted.
///
/// Classes are stored sorted ascending by Unicode scalar value and a class's
/// code is its position in that order. Codes therefore depend only on the set
/// of categories seen during fitting, never on row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedEncoder")]
pub struct CategoricalEncoder {
    column: String,
    classes: Vec<String>,
}

#[derive(Deserialize)]
struct PersistedEncoder {
    column: String,
    classes: Vec<String>,
}

impl TryFrom<PersistedEncoder> for CategoricalEncoder {
    type Error = String;

    fn try_from(p: PersistedEncoder) -> std::result::Result<Self, Self::Error> {
        // Re-sorting would silently change codes the model was trained on.
        if p.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!("classes of '{}' are not strictly ascending", p.column));
        }
        Ok(Self { column: p.column, classes: p.classes })
    }
}

impl CategoricalEncoder {
    /// Fit from the observed values of `column`.
    pub fn fit<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            column: column.to_string(),
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Column this encoder belongs to.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Fitted classes in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether `value` is part of the fitted vocabulary.
    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    fn index_of(&self, value: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    /// Encode one value under the given unseen-category policy.
    pub fn transform(&self, value: &str, policy: UnseenPolicy) -> Result<usize> {
        match (self.index_of(value), policy) {
            (Some(idx), _) => Ok(idx),
            (None, UnseenPolicy::FallbackToFirst) if !self.classes.is_empty() => {
                tracing::debug!(
                    column = %self.column,
                    value = %value,
                    fallback = %self.classes[0],
                    "unseen category replaced by first fitted class"
                );
                Ok(0)
            }
            (None, _) => Err(ChurnError::UnseenCategory {
                column: self.column.clone(),
                value: value.to_string(),
            }),
        }
    }
}
