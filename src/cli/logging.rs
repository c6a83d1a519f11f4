//! Logging setup and plain CLI output.
//!
//! Structured events go to stderr through `tracing`. The filter comes from
//! `RUST_LOG` when set, otherwise from the `-v`/`-q` flags.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    /// Determine the level from the parsed CLI flags. Quiet wins over verbose.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Default `tracing` level when `RUST_LOG` is unset.
    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

fn build_env_filter(level: LogLevel) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level.default_level().as_str())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(level: LogLevel) {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let result = if level == LogLevel::Verbose {
        tracing_subscriber::registry().with(build_env_filter(level)).with(layer).try_init()
    } else {
        tracing_subscriber::registry()
            .with(build_env_filter(level))
            .with(layer.without_time().compact())
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Print a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}
