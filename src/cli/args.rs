//! Command-line arguments.

#[cfg(feature = "server")]
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::drift::Correction;

/// Churnguard: churn prediction with drift monitoring
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "churnguard")]
#[command(version)]
#[command(about = "Train a churn classifier, score customers and watch for input drift")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Train the classifier and write serving artifacts
    Train(TrainArgs),

    /// Score one customer record (JSON) against trained artifacts
    Predict(PredictArgs),

    /// Check a processed CSV batch for drift against the reference sample
    Drift(DriftArgs),

    /// Serve predictions and metrics over HTTP
    #[cfg(feature = "server")]
    Serve(ServeArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to YAML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override the artifacts directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Validate the config without training
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Artifacts directory produced by `train`
    #[arg(short, long, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// JSON file with one customer record
    #[arg(short, long)]
    pub input: PathBuf,

    /// Per-column drift significance level
    #[arg(long, default_value_t = crate::drift::DEFAULT_P_VALUE)]
    pub p_value: f64,
}

/// Arguments for the drift command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct DriftArgs {
    /// Artifacts directory produced by `train`
    #[arg(short, long, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Processed CSV whose header names the feature columns
    #[arg(short, long)]
    pub batch: PathBuf,

    /// Per-column drift significance level
    #[arg(long, default_value_t = crate::drift::DEFAULT_P_VALUE)]
    pub p_value: f64,

    /// Apply a Bonferroni correction across columns
    #[arg(long)]
    pub bonferroni: bool,
}

impl DriftArgs {
    pub fn correction(&self) -> Correction {
        if self.bonferroni {
            Correction::Bonferroni
        } else {
            Correction::None
        }
    }
}

/// Arguments for the serve command
#[cfg(feature = "server")]
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ServeArgs {
    /// Artifacts directory produced by `train`
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// Optional YAML serve configuration; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train() {
        let cli = parse_args(["churnguard", "train", "--config", "cfg.yaml", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Train(args) => {
                assert_eq!(args.config, PathBuf::from("cfg.yaml"));
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_predict_defaults() {
        let cli = parse_args(["churnguard", "predict", "--input", "record.json"]).unwrap();
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.artifacts, PathBuf::from("artifacts"));
                assert_eq!(args.p_value, 0.05);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_drift_bonferroni() {
        let cli =
            parse_args(["churnguard", "-q", "drift", "--batch", "b.csv", "--bonferroni"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Command::Drift(args) => assert_eq!(args.correction(), Correction::Bonferroni),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_argument() {
        assert!(parse_args(["churnguard", "predict"]).is_err());
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_parse_serve() {
        let cli = parse_args(["churnguard", "serve", "--address", "0.0.0.0:8000"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.address.map(|a| a.port()), Some(8000));
                assert!(args.artifacts.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
