//! Predict command implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::artifacts::{read_json, ArtifactPaths, ServingArtifacts};
use crate::cli::logging::log;
use crate::cli::{LogLevel, PredictArgs};
use crate::drift::Correction;
use crate::error::Result;
use crate::metrics::ServingMetrics;
use crate::service::PredictionService;

/// Flatten a JSON object into form fields; numbers keep their written form.
pub fn json_to_fields(record: HashMap<String, serde_json::Value>) -> HashMap<String, String> {
    record
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => return None,
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect()
}

pub fn run_predict(args: PredictArgs, level: LogLevel) -> Result<()> {
    let paths = ArtifactPaths::new(&args.artifacts);
    let artifacts = ServingArtifacts::load(&paths)?;
    let service = PredictionService::new(
        Arc::new(artifacts),
        Arc::new(ServingMetrics::new()),
        args.p_value,
        Correction::None,
    )?;

    let record: HashMap<String, serde_json::Value> = read_json(&args.input)?;
    let prediction = service.predict_form(&json_to_fields(record))?;

    log(level, LogLevel::Normal, prediction.decision.label());
    log(level, LogLevel::Verbose, &format!("  Probability: {:.3}", prediction.probability));
    log(level, LogLevel::Verbose, &format!("  Risk score: {}", prediction.derived.risk_score));
    if prediction.drift.is_drift() {
        log(
            level,
            LogLevel::Normal,
            &format!("  Drift detected in: {}", prediction.drift.drifted_features().join(", ")),
        );
    }
    Ok(())
}
