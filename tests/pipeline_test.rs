//! End-to-end: train on a synthetic raw table, then serve from the written artifacts.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use churnguard::artifacts::{read_json, TrainingManifest};
use churnguard::record::columns;
use churnguard::{
    ArtifactPaths, ChurnError, Decision, FeatureSchema, PipelineConfig, PredictionService,
    ServingArtifacts, TrainingPipeline,
};

const HEADER: &str = "customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,TechSupport,StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,MonthlyCharges,TotalCharges,Churn";

/// Churners are short-tenure month-to-month customers paying by electronic check.
fn write_raw_csv(path: &Path, rows: usize) {
    let mut csv = format!("{HEADER}\n");
    for i in 0..rows {
        let churn = i % 3 == 0;
        let tenure = if churn { i % 12 } else { 12 + i % 60 };
        let contract = if churn {
            "Month-to-month"
        } else {
            ["Month-to-month", "One year", "Two year"][i % 3]
        };
        let payment = if churn {
            "Electronic check"
        } else {
            ["Mailed check", "Bank transfer (automatic)", "Credit card (automatic)", "Electronic check"][i % 4]
        };
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
        let monthly = 20.0 + ((i * 7) % 100) as f64;
        let total = if i % 50 == 7 { " ".to_string() } else { format!("{:.2}", monthly * tenure as f64) };
        writeln!(
            csv,
            "C{i:04},{},{},{},{},{tenure},Yes,{},{},{},{},{},{},{},{},{contract},{},{payment},{monthly:.2},{total},{}",
            if i % 2 == 0 { "Female" } else { "Male" },
            u8::from(i % 5 == 0),
            yes_no(i % 2 == 0),
            yes_no(i % 4 == 0),
            yes_no(i % 3 == 1),
            ["DSL", "Fiber optic", "No"][i % 3],
            yes_no(!churn && i % 2 == 0),
            yes_no(i % 5 == 1),
            yes_no(i % 6 == 2),
            yes_no(!churn && i % 3 == 2),
            yes_no(i % 7 < 3),
            yes_no(i % 2 == 1),
            yes_no(i % 3 != 2),
            yes_no(churn),
        )
        .unwrap();
    }
    std::fs::write(path, csv).unwrap();
}

fn form(tenure: &str, contract: &str, payment: &str) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> =
        columns::CATEGORICAL_INPUTS.iter().map(|c| ((*c).to_string(), "No".to_string())).collect();
    fields.insert(columns::PHONE_SERVICE.into(), "Yes".into());
    fields.insert(columns::INTERNET_SERVICE.into(), "Fiber optic".into());
    fields.insert(columns::CONTRACT.into(), contract.into());
    fields.insert(columns::PAYMENT_METHOD.into(), payment.into());
    fields.insert(columns::TENURE.into(), tenure.into());
    let months: f64 = tenure.parse().unwrap_or(0.0);
    fields.insert(columns::MONTHLY_CHARGES.into(), "70.5".into());
    fields.insert(columns::TOTAL_CHARGES.into(), format!("{:.2}", 70.5 * months));
    fields
}

fn train(dir: &Path) -> ArtifactPaths {
    let raw = dir.join("raw.csv");
    write_raw_csv(&raw, 240);
    let config = PipelineConfig::minimal(&raw, dir.join("artifacts"));
    let report = TrainingPipeline::new(config).unwrap().run().unwrap();
    report.artifacts
}

#[test]
fn test_training_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let paths = train(dir.path());

    for file in [
        paths.model(),
        paths.feature_columns(),
        paths.manifest(),
        paths.encoders(),
        paths.reference_sample(),
        paths.processed_train(),
        paths.processed_test(),
    ] {
        assert!(file.exists(), "missing {}", file.display());
    }

    let manifest: TrainingManifest = read_json(&paths.manifest()).unwrap();
    assert!(manifest.train_rows > manifest.test_rows);
    assert!(manifest.metrics.accuracy > 0.7, "accuracy {}", manifest.metrics.accuracy);

    let schema: FeatureSchema = read_json(&paths.feature_columns()).unwrap();
    assert!(schema.position(columns::CHURN).is_none());
    assert!(schema.position(columns::RISK_SCORE).is_some());
    assert!(schema.position("customerID").is_none());
}

#[test]
fn test_serving_reproduces_training_features() {
    let dir = tempfile::tempdir().unwrap();
    let paths = train(dir.path());
    let service = PredictionService::from_artifacts(ServingArtifacts::load(&paths).unwrap()).unwrap();

    let risky = service.predict_form(&form("2", "Month-to-month", "Electronic check")).unwrap();
    assert_eq!(risky.derived.risk_score, 5);
    assert_eq!(risky.decision, Decision::HighRisk);
    assert_eq!(risky.drift.columns.len(), service.artifacts().schema().len());

    let stable = service.predict_form(&form("60", "Two year", "Mailed check")).unwrap();
    assert_eq!(stable.decision, Decision::LowRisk);
    assert_eq!(service.metrics().predictions(), 2);
}

#[test]
fn test_serving_flags_out_of_range_request() {
    let dir = tempfile::tempdir().unwrap();
    let paths = train(dir.path());
    let service = PredictionService::from_artifacts(ServingArtifacts::load(&paths).unwrap()).unwrap();

    let prediction = service.predict_form(&form("5000", "Two year", "Mailed check")).unwrap();
    assert!(prediction.drift.drifted_features().contains(&columns::TENURE));
    assert_eq!(service.metrics().drift_events(), 1);
    assert!(service.metrics().export().contains("drift_events_total 1"));
}

#[test]
fn test_serving_rejects_malformed_number() {
    let dir = tempfile::tempdir().unwrap();
    let paths = train(dir.path());
    let service = PredictionService::from_artifacts(ServingArtifacts::load(&paths).unwrap()).unwrap();

    let err = service.predict_form(&form("two", "Two year", "Mailed check")).unwrap_err();
    assert!(matches!(err, ChurnError::MalformedNumber { ref field, .. } if field == columns::TENURE));
    assert_eq!(service.metrics().predictions(), 0);
}

#[test]
fn test_same_seed_same_artifacts() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = train(first.path());
    let b = train(second.path());
    assert_eq!(
        std::fs::read_to_string(a.model()).unwrap(),
        std::fs::read_to_string(b.model()).unwrap()
    );
    assert_eq!(
        std::fs::read_to_string(a.reference_sample()).unwrap(),
        std::fs::read_to_string(b.reference_sample()).unwrap()
    );
}
