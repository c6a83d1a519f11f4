//! Train command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, TrainArgs};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::training::TrainingPipeline;

/// Apply command-line overrides to a loaded config.
pub fn apply_overrides(config: &mut PipelineConfig, args: &TrainArgs) {
    if let Some(output_dir) = &args.output_dir {
        config.paths.artifacts_dir = output_dir.clone();
    }
    if let Some(seed) = args.seed {
        config.split.random_state = seed;
    }
}

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<()> {
    log(level, LogLevel::Normal, &format!("Training from {}", args.config.display()));

    let mut config = PipelineConfig::from_file(&args.config)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    if args.dry_run {
        log(level, LogLevel::Normal, "Dry run - config validated successfully");
        log(level, LogLevel::Verbose, &format!("  Raw data: {}", config.paths.raw_data.display()));
        log(level, LogLevel::Verbose, &format!("  Artifacts: {}", config.paths.artifacts_dir.display()));
        log(
            level,
            LogLevel::Verbose,
            &format!("  Model: lr={} epochs={}", config.model.learning_rate, config.model.epochs),
        );
        return Ok(());
    }

    let report = TrainingPipeline::new(config)?.run()?;
    let metrics = &report.manifest.metrics;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Training complete: f1={:.3} precision={:.3} recall={:.3} accuracy={:.3}",
            metrics.f1, metrics.precision, metrics.recall, metrics.accuracy
        ),
    );
    log(level, LogLevel::Verbose, &metrics.confusion.to_string());
    log(level, LogLevel::Normal, &format!("Artifacts written to {}", report.artifacts.root().display()));
    Ok(())
}
