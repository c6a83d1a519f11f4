//! Serve command implementation

use std::sync::Arc;

use crate::artifacts::{ArtifactPaths, ServingArtifacts};
use crate::cli::logging::log;
use crate::cli::{LogLevel, ServeArgs};
use crate::config::ServeConfig;
use crate::error::{ChurnError, Result};
use crate::metrics::ServingMetrics;
use crate::server::{serve, AppState};
use crate::service::PredictionService;

/// Resolve the serve configuration: file first, then flags.
pub fn resolve_config(args: &ServeArgs) -> Result<ServeConfig> {
    let mut config = match &args.config {
        Some(path) => ServeConfig::from_file(path)?,
        None => ServeConfig::default(),
    };
    if let Some(dir) = &args.artifacts {
        config.artifacts_dir = dir.clone();
    }
    if let Some(address) = args.address {
        config.address = address;
    }
    config.validate()?;
    Ok(config)
}

pub fn run_serve(args: ServeArgs, level: LogLevel) -> Result<()> {
    let config = resolve_config(&args)?;

    // Artifacts load before the listener binds; failures stop the process here.
    let artifacts = ServingArtifacts::load(&ArtifactPaths::new(&config.artifacts_dir))?;
    let service = PredictionService::new(
        Arc::new(artifacts),
        Arc::new(ServingMetrics::new()),
        config.p_value,
        config.correction,
    )?;

    log(level, LogLevel::Normal, &format!("Serving on http://{}", config.address));

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| ChurnError::io("starting async runtime", e))?;
    runtime.block_on(serve(config.address, AppState::new(service)))
}
