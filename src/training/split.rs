//! Seeded stratified train/test split.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{ChurnError, Result};
use crate::record::{columns, RawCustomerRecord};

/// Split `rows` keeping each label's share in both halves.
///
/// Each label contributes `round(n_label * (1 - train_ratio))` rows to the
/// test half. The same `seed` always yields the same split.
pub fn stratified_split(
    rows: Vec<RawCustomerRecord>,
    train_ratio: f64,
    seed: u64,
) -> Result<(Vec<RawCustomerRecord>, Vec<RawCustomerRecord>)> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(ChurnError::ConfigValue {
            field: "split.train_ratio".to_string(),
            message: format!("must lie in (0, 1), got {train_ratio}"),
        });
    }

    let mut by_label: BTreeMap<String, Vec<RawCustomerRecord>> = BTreeMap::new();
    for row in rows {
        let label = row
            .churn
            .clone()
            .ok_or_else(|| ChurnError::MissingField { field: columns::CHURN.to_string() })?;
        by_label.entry(label).or_default().push(row);
    }
    if by_label.len() < 2 {
        return Err(ChurnError::InsufficientData {
            message: format!("stratified split needs two labels, found {}", by_label.len()),
        });
    }

    let test_fraction = 1.0 - train_ratio;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (label, mut group) in by_label {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64 * test_fraction).round() as usize).min(group.len());
        tracing::debug!(label = %label, rows = group.len(), test = n_test, "stratum split");
        let rest = group.split_off(n_test);
        test.extend(group);
        train.extend(rest);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: usize, churn: &str) -> RawCustomerRecord {
        RawCustomerRecord {
            customer_id: format!("C{id}"),
            gender: "Male".into(),
            senior_citizen: "0".into(),
            partner: "No".into(),
            dependents: "No".into(),
            tenure: id.to_string(),
            phone_service: "Yes".into(),
            multiple_lines: "No".into(),
            internet_service: "DSL".into(),
            online_security: "No".into(),
            online_backup: "No".into(),
            device_protection: "No".into(),
            tech_support: "No".into(),
            streaming_tv: "No".into(),
            streaming_movies: "No".into(),
            contract: "Month-to-month".into(),
            paperless_billing: "Yes".into(),
            payment_method: "Electronic check".into(),
            monthly_charges: "50.0".into(),
            total_charges: "100.0".into(),
            churn: Some(churn.into()),
        }
    }

    fn dataset() -> Vec<RawCustomerRecord> {
        (0..100).map(|i| row(i, if i < 30 { "Yes" } else { "No" })).collect()
    }

    fn count(rows: &[RawCustomerRecord], label: &str) -> usize {
        rows.iter().filter(|r| r.churn.as_deref() == Some(label)).count()
    }

    #[test]
    fn test_keeps_class_proportions() {
        let (train, test) = stratified_split(dataset(), 0.8, 42).unwrap();
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);
        assert_eq!(count(&test, "Yes"), 6);
        assert_eq!(count(&test, "No"), 14);
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = stratified_split(dataset(), 0.8, 7).unwrap();
        let (b, _) = stratified_split(dataset(), 0.8, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_row_lost_or_duplicated() {
        let (train, test) = stratified_split(dataset(), 0.75, 1).unwrap();
        let mut ids: Vec<String> = train.iter().chain(&test).map(|r| r.customer_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_single_label_rejected() {
        let rows = (0..10).map(|i| row(i, "No")).collect();
        assert!(matches!(
            stratified_split(rows, 0.8, 0),
            Err(ChurnError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_bad_ratio_rejected() {
        assert!(stratified_split(dataset(), 1.0, 0).is_err());
    }
}
