//! YAML configuration for training and serving.
//!
//! ```yaml
//! split:
//!   train_ratio: 0.8
//!   random_state: 42
//! model:
//!   learning_rate: 0.1
//!   epochs: 500
//! balance:
//!   k_neighbors: 5
//! paths:
//!   raw_data: data/raw/telco_churn.csv
//!   artifacts_dir: artifacts
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::drift::{Correction, DEFAULT_P_VALUE};
use crate::error::{ChurnError, Result};
use crate::model::LogisticParams;
use crate::record::columns;

/// Complete training configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub model: LogisticParams,
    #[serde(default)]
    pub balance: BalanceConfig,
    pub paths: PathsConfig,
}

/// Train/test split settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train_ratio: f64,
    pub random_state: u64,
    pub target: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { train_ratio: 0.8, random_state: 42, target: columns::CHURN.to_string() }
    }
}

/// Class balancing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub enabled: bool,
    pub k_neighbors: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self { enabled: true, k_neighbors: 5 }
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub raw_data: PathBuf,
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ChurnError::ConfigNotFound { path: path.to_path_buf() }
        } else {
            ChurnError::io(format!("reading config file: {}", path.display()), e)
        }
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ChurnError {
    ChurnError::ConfigValue { field: field.to_string(), message: message.into() }
}

impl PipelineConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;
        Self::from_yaml(&content, path)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| ChurnError::ConfigParsing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Minimal configuration for `raw_data`, writing to `artifacts_dir`.
    pub fn minimal(raw_data: impl Into<PathBuf>, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            split: SplitConfig::default(),
            model: LogisticParams::default(),
            balance: BalanceConfig::default(),
            paths: PathsConfig { raw_data: raw_data.into(), artifacts_dir: artifacts_dir.into() },
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.split.train_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(invalid("split.train_ratio", format!("must lie in (0, 1), got {ratio}")));
        }
        if self.split.target != columns::CHURN {
            return Err(invalid(
                "split.target",
                format!("only '{}' is supported, got '{}'", columns::CHURN, self.split.target),
            ));
        }
        if self.model.epochs == 0 {
            return Err(invalid("model.epochs", "must be at least 1"));
        }
        if !(self.model.learning_rate > 0.0 && self.model.learning_rate.is_finite()) {
            return Err(invalid("model.learning_rate", "must be positive"));
        }
        if self.model.l2 < 0.0 {
            return Err(invalid("model.l2", "must not be negative"));
        }
        if !(self.model.threshold > 0.0 && self.model.threshold < 1.0) {
            return Err(invalid("model.threshold", "must lie in (0, 1)"));
        }
        if self.balance.enabled && self.balance.k_neighbors == 0 {
            return Err(invalid("balance.k_neighbors", "must be at least 1"));
        }
        Ok(())
    }
}

/// Serving configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub address: SocketAddr,
    pub artifacts_dir: PathBuf,
    pub p_value: f64,
    pub correction: Correction,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            artifacts_dir: default_artifacts_dir(),
            p_value: DEFAULT_P_VALUE,
            correction: Correction::None,
        }
    }
}

impl ServeConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ChurnError::ConfigParsing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.p_value > 0.0 && self.p_value < 1.0) {
            return Err(invalid("p_value", format!("must lie in (0, 1), got {}", self.p_value)));
        }
        Ok(())
    }
}
