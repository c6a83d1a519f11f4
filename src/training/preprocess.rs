//! One preprocessing pass over a split: clean, derive, encode, tabulate.
//!
//! The training split fits the encoder registry; the test split replays it
//! strictly, so an unseen test category fails the run instead of being guessed.

use ndarray::Array2;

use crate::assembly::FeatureSchema;
use crate::encoding::{EncoderRegistry, UnseenPolicy};
use crate::error::{ChurnError, Result};
use crate::features::{prepare, EngineeredRecord, FeatureEngineer};
use crate::record::{CustomerRecord, RawCustomerRecord};

/// Numeric table produced by one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedTable {
    pub schema: FeatureSchema,
    pub features: Array2<f64>,
    pub targets: Vec<usize>,
    pub duplicates_dropped: usize,
    pub imputed: usize,
}

impl ProcessedTable {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }
}

/// Clean and derive, returning the engineered rows with pass statistics.
fn engineer_pass(mut rows: Vec<RawCustomerRecord>) -> Result<(Vec<EngineeredRecord>, usize, usize)> {
    let duplicates = prepare::drop_duplicates(&mut rows);
    if rows.is_empty() {
        return Err(ChurnError::InsufficientData { message: "no rows left after deduplication".into() });
    }

    let fill = prepare::total_charges_median(&rows).ok_or_else(|| ChurnError::InsufficientData {
        message: "no parsable TotalCharges value to impute from".into(),
    })?;
    let imputed = rows.iter().filter(|r| r.total_charges_value().is_none()).count();

    let engineered = rows
        .iter()
        .map(|raw| CustomerRecord::from_raw(raw, fill).map(FeatureEngineer::engineer))
        .collect::<Result<Vec<_>>>()?;
    Ok((engineered, duplicates, imputed))
}

fn tabulate(
    records: &[EngineeredRecord],
    registry: &EncoderRegistry,
    policy: UnseenPolicy,
) -> Result<(FeatureSchema, Array2<f64>, Vec<usize>)> {
    let encoded = records
        .iter()
        .map(|r| registry.encode_features(r, policy))
        .collect::<Result<Vec<_>>>()?;
    let columns = encoded
        .first()
        .map(|e| e.columns().map(str::to_string).collect())
        .unwrap_or_default();
    let schema = FeatureSchema::new(columns)?;
    let features = schema.assemble_batch(&encoded);

    let targets = records
        .iter()
        .map(|r| {
            let label = r.record.churn.as_deref().ok_or_else(|| ChurnError::MissingField {
                field: registry.target().to_string(),
            })?;
            registry.encode_target(label)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((schema, features, targets))
}

/// Process the training split and fit the encoder registry on it.
pub fn fit_pass(rows: Vec<RawCustomerRecord>, target: &str) -> Result<(EncoderRegistry, ProcessedTable)> {
    let (records, duplicates_dropped, imputed) = engineer_pass(rows)?;
    let registry = EncoderRegistry::fit(target, &records);
    let (schema, features, targets) = tabulate(&records, &registry, UnseenPolicy::Reject)?;
    tracing::info!(
        rows = features.nrows(),
        columns = schema.len(),
        duplicates_dropped,
        imputed,
        encoders = registry.len(),
        "training split processed"
    );
    Ok((registry, ProcessedTable { schema, features, targets, duplicates_dropped, imputed }))
}

/// Process a held-out split with an already fitted registry.
pub fn apply_pass(rows: Vec<RawCustomerRecord>, registry: &EncoderRegistry) -> Result<ProcessedTable> {
    let (records, duplicates_dropped, imputed) = engineer_pass(rows)?;
    let (schema, features, targets) = tabulate(&records, registry, UnseenPolicy::Reject)?;
    tracing::info!(rows = features.nrows(), duplicates_dropped, imputed, "held-out split processed");
    Ok(ProcessedTable { schema, features, targets, duplicates_dropped, imputed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::columns;

    fn row(id: &str, contract: &str, total: &str, churn: &str) -> RawCustomerRecord {
        RawCustomerRecord {
            customer_id: id.into(),
            gender: "Female".into(),
            senior_citizen: "0".into(),
            partner: "Yes".into(),
            dependents: "No".into(),
            tenure: "3".into(),
            phone_service: "Yes".into(),
            multiple_lines: "No".into(),
            internet_service: "Fiber optic".into(),
            online_security: "No".into(),
            online_backup: "Yes".into(),
            device_protection: "No".into(),
            tech_support: "No".into(),
            streaming_tv: "Yes".into(),
            streaming_movies: "No".into(),
            contract: contract.into(),
            paperless_billing: "Yes".into(),
            payment_method: "Electronic check".into(),
            monthly_charges: "80.5".into(),
            total_charges: total.into(),
            churn: Some(churn.into()),
        }
    }

    #[test]
    fn test_fit_pass_dedupes_and_imputes() {
        let rows = vec![
            row("A", "Month-to-month", "100.0", "Yes"),
            row("B", "Month-to-month", "100.0", "Yes"),
            row("C", "Two year", "300.0", "No"),
            row("D", "One year", " ", "No"),
        ];
        let (registry, table) = fit_pass(rows, columns::CHURN).unwrap();
        assert_eq!(table.duplicates_dropped, 1);
        assert_eq!(table.imputed, 1);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.targets, vec![1, 0, 0]);

        // Median of {100, 300} fills the blank cell
        let total_idx = table.schema.position(columns::TOTAL_CHARGES).unwrap();
        assert_eq!(table.features[[2, total_idx]], 200.0);
        assert_eq!(registry.get(columns::CONTRACT).unwrap().classes().len(), 3);
    }

    #[test]
    fn test_schema_excludes_identity_and_target() {
        let (_, table) = fit_pass(vec![row("A", "Two year", "1.0", "No")], columns::CHURN).unwrap();
        let names = table.schema.columns();
        assert_eq!(names.len(), 23);
        assert!(!names.iter().any(|c| c == columns::CUSTOMER_ID || c == columns::GENDER));
        assert!(!names.iter().any(|c| c == columns::CHURN));
        assert_eq!(names.last().map(String::as_str), Some(columns::RISK_SCORE));
    }

    #[test]
    fn test_apply_pass_is_strict() {
        let (registry, _) = fit_pass(
            vec![row("A", "Two year", "1.0", "No"), row("B", "One year", "2.0", "Yes")],
            columns::CHURN,
        )
        .unwrap();
        let err = apply_pass(vec![row("C", "Weekly", "3.0", "No")], &registry).unwrap_err();
        assert!(matches!(err, ChurnError::UnseenCategory { .. }));

        let table = apply_pass(vec![row("D", "One year", "3.0", "Yes")], &registry).unwrap();
        assert_eq!(table.targets, vec![1]);
    }

    #[test]
    fn test_all_blank_total_charges_rejected() {
        let err = fit_pass(vec![row("A", "Two year", "", "No")], columns::CHURN).unwrap_err();
        assert!(matches!(err, ChurnError::InsufficientData { .. }));
    }
}
