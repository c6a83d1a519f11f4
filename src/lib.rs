//! Churn prediction with training/serving feature parity and input drift monitoring.
//!
//! The offline half ([`training`]) turns the raw customer CSV into a fitted
//! classifier plus the artifacts serving needs. The online half ([`service`])
//! replays the identical feature transformation for one request, runs a
//! per-feature Kolmogorov-Smirnov check against the training reference and
//! returns a decision.
//!
//! ```text
//! CustomerRecord -> FeatureEngineer -> EncoderRegistry -> FeatureSchema -> KsDriftDetector -> Classifier
//! ```

pub mod artifacts;
pub mod assembly;
pub mod cli;
pub mod config;
pub mod drift;
pub mod encoding;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod record;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod training;

pub use artifacts::{ArtifactPaths, ServingArtifacts};
pub use assembly::FeatureSchema;
pub use config::{PipelineConfig, ServeConfig};
pub use drift::{DriftReport, KsDriftDetector, ReferenceSample};
pub use encoding::{CategoricalEncoder, EncoderRegistry, UnseenPolicy};
pub use error::{ChurnError, Result};
pub use features::{DerivedFields, EngineeredRecord, FeatureEngineer};
pub use metrics::ServingMetrics;
pub use model::{Classifier, LogisticRegression};
pub use record::{CustomerRecord, RawCustomerRecord};
pub use service::{Decision, Prediction, PredictionService};
pub use training::{TrainingPipeline, TrainingReport};
