//! Drift command implementation

use ndarray::Array2;

use crate::artifacts::{read_json, ArtifactPaths};
use crate::cli::logging::log;
use crate::cli::{DriftArgs, LogLevel};
use crate::drift::{DriftReport, KsDriftDetector, ReferenceSample};
use crate::error::{ChurnError, Result};
use crate::training::ingest::read_matrix;

/// Reorder `data` (with `header`) to the reference column order, dropping extras.
pub fn align_to_reference(
    reference: &ReferenceSample,
    header: &[String],
    data: &Array2<f64>,
) -> Result<Array2<f64>> {
    let positions = reference
        .columns()
        .iter()
        .map(|column| {
            header.iter().position(|h| h == column).ok_or_else(|| ChurnError::DriftShape {
                expected: reference.n_columns(),
                actual: header.iter().filter(|h| reference.columns().contains(h)).count(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(data.select(ndarray::Axis(1), &positions))
}

fn render(report: &DriftReport) -> String {
    let mut out = format!("{:<20} {:>10} {:>12}  drifted\n", "feature", "statistic", "p-value");
    for column in &report.columns {
        out.push_str(&format!(
            "{:<20} {:>10.4} {:>12.3e}  {}\n",
            column.feature,
            column.statistic,
            column.p_value,
            if column.drifted { "yes" } else { "no" }
        ));
    }
    out
}

pub fn run_drift(args: DriftArgs, level: LogLevel) -> Result<()> {
    let paths = ArtifactPaths::new(&args.artifacts);
    let reference: ReferenceSample = read_json(&paths.reference_sample())?;
    let detector =
        KsDriftDetector::new(&reference, args.p_value)?.with_correction(args.correction());

    let (header, data) = read_matrix(&args.batch)?;
    let batch = align_to_reference(&reference, &header, &data)?;
    let report = detector.evaluate(&batch)?;

    if report.is_drift() {
        tracing::warn!(
            drifted_columns = report.drifted_count,
            features = ?report.drifted_features(),
            "batch drift detected"
        );
    }

    log(level, LogLevel::Verbose, &render(&report));
    log(
        level,
        LogLevel::Normal,
        &format!(
            "{} of {} columns drifted ({:.1}%, threshold {:.4})",
            report.drifted_count,
            report.columns.len(),
            report.drift_percentage(),
            report.threshold
        ),
    );
    Ok(())
}
