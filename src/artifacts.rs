//! Persisted training outputs and their loading for serving.
//!
//! Layout under the artifacts directory:
//!
//! ```text
//! model/model.json               fitted classifier
//! model/feature_columns.json     ordered feature schema
//! model/manifest.json            run summary
//! encoders/label_encoders.json   encoder registry
//! processed/reference_sample.json
//! processed/processed_train.csv
//! processed/processed_test.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::assembly::FeatureSchema;
use crate::drift::ReferenceSample;
use crate::encoding::EncoderRegistry;
use crate::error::{ChurnError, Result};
use crate::model::{Classifier, LogisticRegression};
use crate::record::columns;
use crate::training::ClassificationMetrics;

/// File locations under one artifacts root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    root: PathBuf,
}

impl ArtifactPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model(&self) -> PathBuf {
        self.root.join("model").join("model.json")
    }

    pub fn feature_columns(&self) -> PathBuf {
        self.root.join("model").join("feature_columns.json")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("model").join("manifest.json")
    }

    pub fn encoders(&self) -> PathBuf {
        self.root.join("encoders").join("label_encoders.json")
    }

    pub fn reference_sample(&self) -> PathBuf {
        self.root.join("processed").join("reference_sample.json")
    }

    pub fn processed_train(&self) -> PathBuf {
        self.root.join("processed").join("processed_train.csv")
    }

    pub fn processed_test(&self) -> PathBuf {
        self.root.join("processed").join("processed_test.csv")
    }

    /// Create the `model`, `encoders` and `processed` subdirectories.
    pub fn create_dirs(&self) -> Result<()> {
        for dir in ["model", "encoders", "processed"] {
            let path = self.root.join(dir);
            fs::create_dir_all(&path)
                .map_err(|e| ChurnError::io(format!("creating {}", path.display()), e))?;
        }
        Ok(())
    }
}

/// Serialize `value` as pretty JSON at `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ChurnError::Serialization { message: format!("{}: {e}", path.display()) })?;
    fs::write(path, json).map_err(|e| ChurnError::io(format!("writing {}", path.display()), e))
}

/// Read JSON from `path`; a missing file or undecodable content is an artifact error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChurnError::ArtifactNotFound { path: path.to_path_buf() });
        }
        Err(e) => return Err(ChurnError::io(format!("reading {}", path.display()), e)),
    };
    serde_json::from_str(&content).map_err(|e| ChurnError::ArtifactCorrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Summary of a training run, written next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingManifest {
    pub created_at: DateTime<Utc>,
    pub crate_version: String,
    pub train_rows: usize,
    pub test_rows: usize,
    pub features: usize,
    pub duplicates_dropped: usize,
    pub metrics: ClassificationMetrics,
}

/// Everything the serving path needs, loaded once and never mutated.
pub struct ServingArtifacts {
    classifier: Box<dyn Classifier>,
    encoders: EncoderRegistry,
    schema: FeatureSchema,
    reference: ReferenceSample,
}

impl std::fmt::Debug for ServingArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServingArtifacts")
            .field("features", &self.schema.len())
            .field("encoders", &self.encoders.len())
            .field("reference_rows", &self.reference.n_rows())
            .finish_non_exhaustive()
    }
}

impl ServingArtifacts {
    /// Bundle artifacts, checking that they describe the same feature layout.
    pub fn new(
        classifier: Box<dyn Classifier>,
        encoders: EncoderRegistry,
        schema: FeatureSchema,
        reference: ReferenceSample,
    ) -> Result<Self> {
        if reference.columns() != schema.columns() {
            return Err(ChurnError::SchemaMismatch {
                expected: schema.len(),
                actual: reference.n_columns(),
            });
        }
        match classifier.n_features() {
            Some(n) if n == schema.len() => {}
            Some(n) => return Err(ChurnError::SchemaMismatch { expected: schema.len(), actual: n }),
            None => {
                let message = "classifier artifact is not fitted".into();
                return Err(ChurnError::Training { message });
            }
        }
        encoders.ensure_covers(columns::CATEGORICAL_INPUTS)?;
        Ok(Self { classifier, encoders, schema, reference })
    }

    /// Load the four serving artifacts from `paths`. Any failure is fatal.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let model: LogisticRegression = read_json(&paths.model())?;
        let encoders: EncoderRegistry = read_json(&paths.encoders())?;
        let schema: FeatureSchema = read_json(&paths.feature_columns())?;
        let reference: ReferenceSample = read_json(&paths.reference_sample())?;

        let artifacts = Self::new(Box::new(model), encoders, schema, reference)?;
        tracing::info!(root = %paths.root().display(), ?artifacts, "serving artifacts loaded");
        Ok(artifacts)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn reference(&self) -> &ReferenceSample {
        &self.reference
    }
}
