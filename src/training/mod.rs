//! Offline training pipeline.
//!
//! Stages run in order: [`ingest`] the raw CSV, [`split`] it stratified by the
//! target, [`preprocess`] each half, [`balance`] with SMOTE, fit the classifier
//! and [`evaluate`] it on the held-out half. [`TrainingPipeline::run`] ties them
//! together and writes the serving artifacts.

pub mod balance;
pub mod evaluate;
pub mod ingest;
mod pipeline;
pub mod preprocess;
pub mod split;

pub use evaluate::{ClassificationMetrics, ConfusionMatrix};
pub use pipeline::{TrainingPipeline, TrainingReport};
