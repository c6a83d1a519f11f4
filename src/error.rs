//! Error types with actionable diagnostics.
//!
//! Every variant carries the column, value or path that caused it so a failed
//! request or a failed training run can be reproduced from the log line alone.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for churnguard operations.
pub type Result<T> = std::result::Result<T, ChurnError>;

/// Errors raised by the feature pipeline, drift detector, training and serving.
#[derive(Error, Debug)]
pub enum ChurnError {
    /// A required raw field was not submitted.
    #[error("Missing required field '{field}'\n  → Submit a value for every categorical attribute")]
    MissingField { field: String },

    /// A numeric field could not be parsed.
    #[error("Malformed number for '{field}': {value:?}\n  → Use digits with an optional decimal point")]
    MalformedNumber { field: String, value: String },

    /// A numeric field that must not be negative was.
    #[error("Negative value for '{field}': {value}\n  → Submit a value of zero or more")]
    NegativeNumber { field: String, value: f64 },

    /// An assembled feature is NaN or infinite.
    #[error("Non-finite value in feature '{column}'\n  → Check the numeric inputs the feature is derived from")]
    NonFiniteFeature { column: String },

    /// A category absent from the fitted vocabulary reached a strict transform.
    #[error("Unseen category {value:?} in column '{column}'\n  → Refit the encoders or use the lenient transform")]
    UnseenCategory { column: String, value: String },

    /// A categorical column has no fitted encoder.
    #[error("No fitted encoder for categorical column '{column}'\n  → Encoder registry and feature pipeline are out of sync")]
    MissingEncoder { column: String },

    /// The trained feature schema has no columns.
    #[error("Feature schema is empty\n  → Re-run training to regenerate feature_columns.json")]
    EmptySchema,

    /// The trained feature schema names a column twice.
    #[error("Feature schema lists column '{column}' more than once")]
    DuplicateColumn { column: String },

    /// Artifact column sets cannot be reconciled.
    #[error("Schema mismatch: expected {expected} columns, got {actual}\n  → Artifacts come from different training runs")]
    SchemaMismatch { expected: usize, actual: usize },

    /// The observation batch does not match the reference sample's width.
    #[error("Drift check shape mismatch: reference has {expected} columns, batch has {actual}")]
    DriftShape { expected: usize, actual: usize },

    /// The reference sample has no rows.
    #[error("Reference sample is empty\n  → Re-run training to regenerate reference_sample.json")]
    EmptyReference,

    /// An artifact file is missing.
    #[error("Artifact not found: {path}\n  → Run `churnguard train` to produce the artifacts")]
    ArtifactNotFound { path: PathBuf },

    /// An artifact file exists but cannot be decoded.
    #[error("Corrupt artifact {path}: {message}")]
    ArtifactCorrupt { path: PathBuf, message: String },

    /// Training could not proceed.
    #[error("Training failed: {message}")]
    Training { message: String },

    /// Not enough rows or classes to run a training stage.
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    /// Configuration file not found at expected path.
    #[error("Configuration file not found: {path}\n  → Pass --config with an existing YAML file")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file has invalid syntax.
    #[error("Invalid configuration syntax in {path}:\n  {message}")]
    ConfigParsing { path: PathBuf, message: String },

    /// Configuration value is out of range.
    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValue { field: String, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ChurnError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether the error stems from the caller's input rather than the deployment.
    ///
    /// Request errors are reported back to the caller; everything else means the
    /// artifacts or the process are unfit to serve.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::MalformedNumber { .. }
                | Self::NegativeNumber { .. }
                | Self::NonFiniteFeature { .. }
                | Self::UnseenCategory { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "E001",
            Self::MalformedNumber { .. } => "E002",
            Self::UnseenCategory { .. } => "E003",
            Self::NegativeNumber { .. } => "E004",
            Self::NonFiniteFeature { .. } => "E005",
            Self::MissingEncoder { .. } => "E013",
            Self::EmptySchema => "E010",
            Self::DuplicateColumn { .. } => "E011",
            Self::SchemaMismatch { .. } => "E012",
            Self::DriftShape { .. } => "E020",
            Self::EmptyReference => "E021",
            Self::ArtifactNotFound { .. } => "E030",
            Self::ArtifactCorrupt { .. } => "E031",
            Self::Training { .. } => "E040",
            Self::InsufficientData { .. } => "E041",
            Self::ConfigNotFound { .. } => "E050",
            Self::ConfigParsing { .. } => "E051",
            Self::ConfigValue { .. } => "E052",
            Self::Io { .. } => "E060",
            Self::Csv(_) => "E061",
            Self::Serialization { .. } => "E062",
        }
    }
}
