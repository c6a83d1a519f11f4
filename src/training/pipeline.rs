//! End-to-end training run: raw CSV in, serving artifacts out.

use chrono::Utc;

use super::balance::Smote;
use super::evaluate::ClassificationMetrics;
use super::ingest::{read_raw_records, write_matrix};
use super::preprocess::{apply_pass, fit_pass, ProcessedTable};
use super::split::stratified_split;
use crate::artifacts::{write_json, ArtifactPaths, TrainingManifest};
use crate::config::PipelineConfig;
use crate::drift::ReferenceSample;
use crate::error::{ChurnError, Result};
use crate::model::{Classifier, LogisticRegression};

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub manifest: TrainingManifest,
    pub artifacts: ArtifactPaths,
}

/// Single-threaded, run-to-completion training pipeline.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: PipelineConfig,
}

impl TrainingPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn balance(&self, table: &ProcessedTable) -> Result<(ndarray::Array2<f64>, Vec<usize>)> {
        if !self.config.balance.enabled {
            return Ok((table.features.clone(), table.targets.clone()));
        }
        Smote::new(self.config.balance.k_neighbors, self.config.split.random_state)
            .fit_resample(&table.features, &table.targets)
    }

    /// Run every stage and write the artifacts.
    pub fn run(&self) -> Result<TrainingReport> {
        let cfg = &self.config;
        let paths = ArtifactPaths::new(&cfg.paths.artifacts_dir);

        let rows = read_raw_records(&cfg.paths.raw_data)?;
        let (train_rows, test_rows) =
            stratified_split(rows, cfg.split.train_ratio, cfg.split.random_state)?;

        let (encoders, train) = fit_pass(train_rows, &cfg.split.target)?;
        let test = apply_pass(test_rows, &encoders)?;
        if test.schema != train.schema {
            return Err(ChurnError::SchemaMismatch {
                expected: train.schema.len(),
                actual: test.schema.len(),
            });
        }

        let (x_train, y_train) = self.balance(&train)?;
        let (x_test, y_test) = self.balance(&test)?;
        tracing::info!(
            train_rows = x_train.nrows(),
            test_rows = x_test.nrows(),
            balanced = cfg.balance.enabled,
            "splits ready"
        );

        let mut model = LogisticRegression::new(cfg.model);
        model.fit(&x_train, &y_train)?;
        let predictions = model.predict(&x_test)?;
        let metrics = ClassificationMetrics::from_predictions(&predictions, &y_test)?;
        let log_loss = model.log_loss(&x_test, &y_test)?;
        tracing::info!(
            log_loss,
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1,
            "held-out evaluation"
        );
        tracing::debug!("\n{}", metrics.confusion);

        let reference = ReferenceSample::new(train.schema.columns().to_vec(), x_train.clone())?;

        paths.create_dirs()?;
        write_json(&paths.model(), &model)?;
        write_json(&paths.feature_columns(), &train.schema)?;
        write_json(&paths.encoders(), &encoders)?;
        tracing::info!(
            path = %paths.encoders().display(),
            encoders = encoders.len(),
            "encoder registry saved"
        );
        write_json(&paths.reference_sample(), &reference)?;
        let target = cfg.split.target.as_str();
        write_matrix(
            &paths.processed_train(),
            train.schema.columns(),
            &x_train,
            Some((target, y_train.as_slice())),
        )?;
        write_matrix(
            &paths.processed_test(),
            test.schema.columns(),
            &x_test,
            Some((target, y_test.as_slice())),
        )?;

        let manifest = TrainingManifest {
            created_at: Utc::now(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            train_rows: x_train.nrows(),
            test_rows: x_test.nrows(),
            features: train.schema.len(),
            duplicates_dropped: train.duplicates_dropped + test.duplicates_dropped,
            metrics,
        };
        write_json(&paths.manifest(), &manifest)?;
        tracing::info!(artifacts = %paths.root().display(), "training artifacts written");

        Ok(TrainingReport { manifest, artifacts: paths })
    }
}
