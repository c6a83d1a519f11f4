//! Derived churn features and the engineered column layout.

use serde::{Deserialize, Serialize};

use super::normalize;
use crate::record::{columns, CustomerRecord};

/// Tenure (months) below which a customer counts as new for `RiskScore`.
pub const NEW_CUSTOMER_TENURE: f64 = 6.0;

/// The five calculated fields appended to every record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// `TotalCharges / (tenure + 1)`
    #[serde(rename = "AvgMonthlySpend")]
    pub avg_monthly_spend: f64,
    /// Online add-ons answered "No" (0..=4)
    #[serde(rename = "NoOnlineServices")]
    pub no_online_services: u8,
    /// Streaming add-ons answered "No" (0..=2)
    #[serde(rename = "NoStreaming")]
    pub no_streaming: u8,
    /// Active services among the nine service columns (0..=9)
    #[serde(rename = "TotalServices")]
    pub total_services: u8,
    /// Risk conditions that hold (0..=5)
    #[serde(rename = "RiskScore")]
    pub risk_score: u8,
}

/// A cell of the engineered table before encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    /// Already numeric
    Number(f64),
    /// Category text, encoded by the registry
    Category(&'a str),
}

/// A customer record with its derived fields attached.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeredRecord {
    pub record: CustomerRecord,
    pub derived: DerivedFields,
}

impl EngineeredRecord {
    /// All cells in engineered column order.
    ///
    /// This order is the one training writes to `feature_columns.json` (minus
    /// the target), so serving reproduces it by construction. The target cell is
    /// only present when the record carries a label.
    pub fn cells(&self) -> Vec<(&'static str, Cell<'_>)> {
        let r = &self.record;
        let d = &self.derived;
        let mut cells = vec![
            (columns::SENIOR_CITIZEN, Cell::Number(r.senior_citizen)),
            (columns::PARTNER, Cell::Category(&r.partner)),
            (columns::DEPENDENTS, Cell::Category(&r.dependents)),
            (columns::TENURE, Cell::Number(r.tenure)),
            (columns::PHONE_SERVICE, Cell::Category(&r.phone_service)),
            (columns::MULTIPLE_LINES, Cell::Category(&r.multiple_lines)),
            (columns::INTERNET_SERVICE, Cell::Category(&r.internet_service)),
            (columns::ONLINE_SECURITY, Cell::Category(&r.online_security)),
            (columns::ONLINE_BACKUP, Cell::Category(&r.online_backup)),
            (columns::DEVICE_PROTECTION, Cell::Category(&r.device_protection)),
            (columns::TECH_SUPPORT, Cell::Category(&r.tech_support)),
            (columns::STREAMING_TV, Cell::Category(&r.streaming_tv)),
            (columns::STREAMING_MOVIES, Cell::Category(&r.streaming_movies)),
            (columns::CONTRACT, Cell::Category(&r.contract)),
            (columns::PAPERLESS_BILLING, Cell::Category(&r.paperless_billing)),
            (columns::PAYMENT_METHOD, Cell::Category(&r.payment_method)),
            (columns::MONTHLY_CHARGES, Cell::Number(r.monthly_charges)),
            (columns::TOTAL_CHARGES, Cell::Number(r.total_charges)),
        ];
        if let Some(churn) = &r.churn {
            cells.push((columns::CHURN, Cell::Category(churn)));
        }
        cells.extend([
            (columns::AVG_MONTHLY_SPEND, Cell::Number(d.avg_monthly_spend)),
            (columns::NO_ONLINE_SERVICES, Cell::Number(f64::from(d.no_online_services))),
            (columns::NO_STREAMING, Cell::Number(f64::from(d.no_streaming))),
            (columns::TOTAL_SERVICES, Cell::Number(f64::from(d.total_services))),
            (columns::RISK_SCORE, Cell::Number(f64::from(d.risk_score))),
        ]);
        cells
    }
}

/// Service columns as seen after canonicalization.
struct NormalizedServices {
    phone_service: &'static str,
    multiple_lines: &'static str,
    internet_service: &'static str,
    online_security: &'static str,
    online_backup: &'static str,
    device_protection: &'static str,
    tech_support: &'static str,
    streaming_tv: &'static str,
    streaming_movies: &'static str,
}

impl NormalizedServices {
    fn of(r: &CustomerRecord) -> Self {
        Self {
            phone_service: normalize::yes_no(&r.phone_service),
            multiple_lines: normalize::yes_no(&r.multiple_lines),
            internet_service: normalize::internet_service(&r.internet_service),
            online_security: normalize::yes_no(&r.online_security),
            online_backup: normalize::yes_no(&r.online_backup),
            device_protection: normalize::yes_no(&r.device_protection),
            tech_support: normalize::yes_no(&r.tech_support),
            streaming_tv: normalize::yes_no(&r.streaming_tv),
            streaming_movies: normalize::yes_no(&r.streaming_movies),
        }
    }

    fn all(&self) -> [&'static str; 9] {
        [
            self.phone_service,
            self.multiple_lines,
            self.internet_service,
            self.online_security,
            self.online_backup,
            self.device_protection,
            self.tech_support,
            self.streaming_tv,
            self.streaming_movies,
        ]
    }
}

fn count_eq(values: &[&str], target: &str) -> u8 {
    values.iter().filter(|v| **v == target).count() as u8
}

/// Derives the calculated fields. Shared by the training pass and every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Compute the derived fields of one record. Pure and deterministic.
    pub fn derive(record: &CustomerRecord) -> DerivedFields {
        let s = NormalizedServices::of(record);

        let no_online_services = count_eq(
            &[s.online_security, s.online_backup, s.device_protection, s.tech_support],
            "No",
        );
        let no_streaming = count_eq(&[s.streaming_tv, s.streaming_movies], "No");

        let total_services = s
            .all()
            .into_iter()
            .filter(|v| !normalize::is_no_service(v) && normalize::ACTIVE_SERVICE_VALUES.contains(v))
            .count() as u8;

        let risk_conditions = [
            record.contract == "Month-to-month",
            s.online_security == "No",
            s.tech_support == "No",
            record.payment_method == "Electronic check",
            record.tenure < NEW_CUSTOMER_TENURE,
        ];
        let risk_score = risk_conditions.iter().filter(|c| **c).count() as u8;

        DerivedFields {
            avg_monthly_spend: record.total_charges / (record.tenure + 1.0),
            no_online_services,
            no_streaming,
            total_services,
            risk_score,
        }
    }

    /// Attach the derived fields to a record.
    pub fn engineer(record: CustomerRecord) -> EngineeredRecord {
        let derived = Self::derive(&record);
        EngineeredRecord { record, derived }
    }
}
