//! Single-request orchestration for online scoring.
//!
//! A request flows through the same [`FeatureEngineer`] and encoder registry as
//! training, is assembled against the trained schema, drift-checked against the
//! reference sample and only then classified. Any failing stage fails the
//! request; there is no prediction without a drift verdict.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::artifacts::ServingArtifacts;
use crate::drift::{Correction, DriftReport, KsDriftDetector, DEFAULT_P_VALUE};
use crate::encoding::UnseenPolicy;
use crate::error::{ChurnError, Result};
use crate::features::{DerivedFields, FeatureEngineer};
use crate::metrics::ServingMetrics;
use crate::model::{NEGATIVE_CLASS, POSITIVE_CLASS};
use crate::record::CustomerRecord;

/// User-facing outcome of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    #[serde(rename = "High risk of churn")]
    HighRisk,
    #[serde(rename = "Low risk: customer stable")]
    LowRisk,
}

impl Decision {
    /// Map an encoded class to a decision.
    pub fn from_class(class: usize) -> Self {
        if class == POSITIVE_CLASS {
            Decision::HighRisk
        } else {
            Decision::LowRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::HighRisk => "High risk of churn",
            Decision::LowRisk => "Low risk: customer stable",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one served request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub decision: Decision,
    pub probability: f64,
    pub derived: DerivedFields,
    pub drift: DriftReport,
}

/// Scores requests against immutable artifacts and shared metrics.
///
/// Holds no per-request state; `predict` takes `&self` and may run on any
/// number of threads at once.
#[derive(Debug)]
pub struct PredictionService {
    artifacts: Arc<ServingArtifacts>,
    detector: KsDriftDetector,
    metrics: Arc<ServingMetrics>,
}

impl PredictionService {
    /// Build with an explicit drift significance level and correction.
    pub fn new(
        artifacts: Arc<ServingArtifacts>,
        metrics: Arc<ServingMetrics>,
        p_value: f64,
        correction: Correction,
    ) -> Result<Self> {
        let detector =
            KsDriftDetector::new(artifacts.reference(), p_value)?.with_correction(correction);
        Ok(Self { artifacts, detector, metrics })
    }

    /// Build with the default 0.05 per-column test and fresh metrics.
    pub fn from_artifacts(artifacts: ServingArtifacts) -> Result<Self> {
        let metrics = Arc::new(ServingMetrics::new());
        Self::new(Arc::new(artifacts), metrics, DEFAULT_P_VALUE, Correction::None)
    }

    pub fn metrics(&self) -> &ServingMetrics {
        &self.metrics
    }

    pub fn artifacts(&self) -> &ServingArtifacts {
        &self.artifacts
    }

    /// Score submitted form fields.
    pub fn predict_form(&self, fields: &HashMap<String, String>) -> Result<Prediction> {
        let record = CustomerRecord::from_form(fields).inspect_err(|e| {
            tracing::error!(code = e.code(), error = %e, "request rejected");
        })?;
        self.predict(record)
    }

    /// Score one typed record.
    pub fn predict(&self, record: CustomerRecord) -> Result<Prediction> {
        self.score(record).inspect_err(|e| {
            tracing::error!(code = e.code(), error = %e, "prediction failed");
        })
    }

    fn score(&self, record: CustomerRecord) -> Result<Prediction> {
        record.validate()?;
        let engineered = FeatureEngineer::engineer(record);
        let encoded = self
            .artifacts
            .encoders()
            .encode_features(&engineered, UnseenPolicy::FallbackToFirst)?;

        let (vector, assembly) = self.artifacts.schema().assemble_with_report(&encoded);
        if !assembly.is_exact() {
            tracing::debug!(
                filled = ?assembly.filled,
                dropped = ?assembly.dropped,
                "schema reconciled"
            );
        }
        let batch = vector.to_batch();

        let drift = self.detector.evaluate(&batch)?;
        self.metrics.record_drift(drift.drifted_count);
        if drift.is_drift() {
            tracing::warn!(
                drifted_columns = drift.drifted_count,
                features = ?drift.drifted_features(),
                "input drift detected"
            );
        } else {
            tracing::debug!("no drift detected");
        }

        let classifier = self.artifacts.classifier();
        let probability = classifier
            .predict_proba(&batch)?
            .first()
            .copied()
            .ok_or(ChurnError::SchemaMismatch { expected: 1, actual: 0 })?;
        let class =
            if probability >= classifier.threshold() { POSITIVE_CLASS } else { NEGATIVE_CLASS };
        self.metrics.record_prediction();

        let decision = Decision::from_class(class);
        tracing::info!(decision = decision.label(), probability, "prediction served");
        Ok(Prediction { decision, probability, derived: engineered.derived, drift })
    }
}

/// Fixtures shared with the HTTP layer tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use super::*;
    use crate::assembly::FeatureSchema;
    use crate::drift::ReferenceSample;
    use crate::encoding::EncoderRegistry;
    use crate::features::EngineeredRecord;
    use crate::model::Classifier;
    use crate::record::columns;
    use ndarray::{Array1, Array2};

    /// Predicts churn whenever `RiskScore` is at least 4.
    struct RiskRule {
        risk_idx: usize,
        width: usize,
    }

    impl Classifier for RiskRule {
        fn fit(&mut self, _: &Array2<f64>, _: &[usize]) -> Result<()> {
            Ok(())
        }

        fn predict_proba(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(features.column(self.risk_idx).mapv(|r| if r >= 4.0 { 0.9 } else { 0.1 }))
        }

        fn n_features(&self) -> Option<usize> {
            Some(self.width)
        }
    }

    pub(crate) fn customer(tenure: f64, contract: &str, churn: Option<&str>) -> CustomerRecord {
        CustomerRecord {
            senior_citizen: 0.0,
            partner: "No".into(),
            dependents: "No".into(),
            tenure,
            phone_service: "Yes".into(),
            multiple_lines: "No".into(),
            internet_service: "Fiber optic".into(),
            online_security: "No".into(),
            online_backup: "No".into(),
            device_protection: "No".into(),
            tech_support: "No".into(),
            streaming_tv: "No".into(),
            streaming_movies: "No".into(),
            contract: contract.into(),
            paperless_billing: "Yes".into(),
            payment_method: "Electronic check".into(),
            monthly_charges: 70.0,
            total_charges: 70.0 * tenure,
            churn: churn.map(str::to_string),
        }
    }

    /// Returns no probabilities at all.
    struct Silent {
        width: usize,
    }

    impl Classifier for Silent {
        fn fit(&mut self, _: &Array2<f64>, _: &[usize]) -> Result<()> {
            Ok(())
        }

        fn predict_proba(&self, _: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(Array1::zeros(0))
        }

        fn n_features(&self) -> Option<usize> {
            Some(self.width)
        }
    }

    pub(crate) fn service() -> PredictionService {
        build(|schema| {
            Box::new(RiskRule {
                risk_idx: schema.position(columns::RISK_SCORE).unwrap(),
                width: schema.len(),
            })
        })
    }

    pub(crate) fn silent_service() -> PredictionService {
        build(|schema| Box::new(Silent { width: schema.len() }))
    }

    fn build(classifier: impl FnOnce(&FeatureSchema) -> Box<dyn Classifier>) -> PredictionService {
        let training: Vec<EngineeredRecord> = (0..60)
            .map(|i| {
                let contract = ["Month-to-month", "One year", "Two year"][i % 3];
                let label = if i % 3 == 0 { "Yes" } else { "No" };
                FeatureEngineer::engineer(customer(i as f64, contract, Some(label)))
            })
            .collect();
        let encoders = EncoderRegistry::fit(columns::CHURN, &training);
        let encoded: Vec<_> = training
            .iter()
            .map(|r| encoders.encode_features(r, UnseenPolicy::Reject).unwrap())
            .collect();
        let schema =
            FeatureSchema::new(encoded[0].columns().map(str::to_string).collect()).unwrap();
        let data = schema.assemble_batch(&encoded);
        let reference = ReferenceSample::new(schema.columns().to_vec(), data).unwrap();
        let classifier = classifier(&schema);
        let artifacts = ServingArtifacts::new(classifier, encoders, schema, reference).unwrap();
        PredictionService::from_artifacts(artifacts).unwrap()
    }

    pub(crate) fn form(tenure: &str, contract: &str) -> HashMap<String, String> {
        let mut fields: HashMap<String, String> = columns::CATEGORICAL_INPUTS
            .iter()
            .map(|c| ((*c).to_string(), "No".to_string()))
            .collect();
        fields.insert(columns::PHONE_SERVICE.into(), "Yes".into());
        fields.insert(columns::INTERNET_SERVICE.into(), "Fiber optic".into());
        fields.insert(columns::CONTRACT.into(), contract.into());
        fields.insert(columns::PAYMENT_METHOD.into(), "Electronic check".into());
        fields.insert(columns::TENURE.into(), tenure.into());
        fields.insert(columns::MONTHLY_CHARGES.into(), "70.0".into());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{customer, form, service, silent_service};
    use super::*;
    use crate::error::ChurnError;
    use crate::record::columns;

    #[test]
    fn test_decision_labels() {
        assert_eq!(Decision::from_class(POSITIVE_CLASS).label(), "High risk of churn");
        assert_eq!(Decision::from_class(NEGATIVE_CLASS).label(), "Low risk: customer stable");
        assert_eq!(serde_json::to_string(&Decision::HighRisk).unwrap(), r#""High risk of churn""#);
    }

    #[test]
    fn test_high_risk_prediction() {
        let service = service();
        let prediction = service.predict(customer(2.0, "Month-to-month", None)).unwrap();
        assert_eq!(prediction.decision, Decision::HighRisk);
        assert_eq!(prediction.derived.risk_score, 5);
        assert_eq!(service.metrics().predictions(), 1);
    }

    #[test]
    fn test_low_risk_prediction_from_form() {
        let service = service();
        let prediction = service.predict_form(&form("30", "Two year")).unwrap();
        assert_eq!(prediction.decision, Decision::LowRisk);
        assert_eq!(prediction.drift.columns.len(), service.artifacts().schema().len());
    }

    #[test]
    fn test_unseen_category_falls_back() {
        let service = service();
        let prediction = service.predict_form(&form("30", "Weekly")).unwrap();
        assert_eq!(prediction.derived.risk_score, 3);
        assert_eq!(service.metrics().predictions(), 1);
    }

    #[test]
    fn test_request_error_counts_nothing() {
        let service = service();
        let mut fields = form("30", "Two year");
        fields.remove(columns::CONTRACT);
        let err = service.predict_form(&fields).unwrap_err();
        assert!(err.is_request_error());
        assert!(matches!(err, ChurnError::MissingField { .. }));
        assert_eq!(service.metrics().predictions(), 0);
    }

    #[test]
    fn test_negative_tenure_form_is_rejected() {
        let service = service();
        let mut fields = form("-1", "Two year");
        fields.insert(columns::TOTAL_CHARGES.into(), "0".into());
        let err = service.predict_form(&fields).unwrap_err();
        assert!(matches!(err, ChurnError::NegativeNumber { ref field, .. } if field == "tenure"));
        assert!(err.is_request_error());
        assert_eq!(service.metrics().predictions(), 0);
        assert_eq!(service.metrics().drift_events(), 0);
    }

    #[test]
    fn test_negative_typed_record_is_rejected() {
        let service = service();
        let err = service.predict(customer(-1.0, "Month-to-month", None)).unwrap_err();
        assert!(matches!(err, ChurnError::NegativeNumber { .. }));
        assert!(err.is_request_error());
        assert_eq!(service.metrics().predictions(), 0);
    }

    #[test]
    fn test_non_finite_charges_are_rejected() {
        let service = service();
        let mut record = customer(12.0, "One year", None);
        record.monthly_charges = f64::NAN;
        let err = service.predict(record).unwrap_err();
        assert!(
            matches!(err, ChurnError::NonFiniteFeature { ref column } if column == "MonthlyCharges")
        );
        assert!(err.is_request_error());
        assert_eq!(service.metrics().predictions(), 0);
    }

    #[test]
    fn test_empty_classifier_output_is_schema_mismatch() {
        let service = silent_service();
        let err = service.predict(customer(12.0, "One year", None)).unwrap_err();
        assert!(matches!(err, ChurnError::SchemaMismatch { expected: 1, actual: 0 }));
        assert!(!err.is_request_error());
        assert_eq!(service.metrics().predictions(), 0);
    }

    #[test]
    fn test_extreme_input_drifts_and_updates_metrics() {
        let service = service();
        service.predict(customer(10_000.0, "Two year", None)).unwrap();
        let drifted = service.metrics().drift_columns();
        assert!(drifted >= 1);
        assert_eq!(service.metrics().drift_events(), 1);

        service.predict(customer(30.0, "Two year", None)).unwrap();
        assert_eq!(service.metrics().drift_columns(), 0);
        assert_eq!(service.metrics().drift_events(), 1);
        assert_eq!(service.metrics().predictions(), 2);
    }

    #[test]
    fn test_concurrent_requests_keep_counts() {
        let service = service();
        std::thread::scope(|scope| {
            for t in 0..8 {
                let service = &service;
                scope.spawn(move || {
                    for i in 0..10 {
                        let tenure = if (t + i) % 2 == 0 { 10_000.0 } else { 30.0 };
                        service.predict(customer(tenure, "One year", None)).unwrap();
                    }
                });
            }
        });
        assert_eq!(service.metrics().predictions(), 80);
        assert_eq!(service.metrics().drift_events(), 40);
    }
}
