//! Dataset-pass cleaning that runs before derivation during training.

use std::collections::HashSet;

use crate::record::RawCustomerRecord;

/// Drop rows whose content (identity columns excluded) repeats an earlier row.
///
/// Keeps the first occurrence and preserves order. Returns the number of rows removed.
pub fn drop_duplicates(rows: &mut Vec<RawCustomerRecord>) -> usize {
    let before = rows.len();
    let mut seen: HashSet<[String; 19]> = HashSet::with_capacity(rows.len());
    rows.retain(|row| seen.insert(row.content_key().map(str::to_string)));
    before - rows.len()
}

/// Median of the parsable `TotalCharges` values of one dataset pass.
///
/// Unparsable cells are skipped. `None` when nothing parses.
pub fn total_charges_median(rows: &[RawCustomerRecord]) -> Option<f64> {
    let values: Vec<f64> = rows.iter().filter_map(RawCustomerRecord::total_charges_value).collect();
    median(values)
}

/// Median with the midpoint rule for even lengths.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
