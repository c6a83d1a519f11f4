//! Customer records as ingested (CSV rows) and as consumed by the feature pipeline.
//!
//! [`RawCustomerRecord`] mirrors the raw table one string per cell. It keeps the
//! identifying columns so duplicates and imputation can be handled per dataset
//! pass. [`CustomerRecord`] is the typed record both training and serving feed
//! into [`crate::features::FeatureEngineer`]; the identifying columns never
//! reach it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};

/// Column names shared by ingestion, encoding and the trained schema.
pub mod columns {
    pub const CUSTOMER_ID: &str = "customerID";
    pub const GENDER: &str = "gender";
    pub const SENIOR_CITIZEN: &str = "SeniorCitizen";
    pub const PARTNER: &str = "Partner";
    pub const DEPENDENTS: &str = "Dependents";
    pub const TENURE: &str = "tenure";
    pub const PHONE_SERVICE: &str = "PhoneService";
    pub const MULTIPLE_LINES: &str = "MultipleLines";
    pub const INTERNET_SERVICE: &str = "InternetService";
    pub const ONLINE_SECURITY: &str = "OnlineSecurity";
    pub const ONLINE_BACKUP: &str = "OnlineBackup";
    pub const DEVICE_PROTECTION: &str = "DeviceProtection";
    pub const TECH_SUPPORT: &str = "TechSupport";
    pub const STREAMING_TV: &str = "StreamingTV";
    pub const STREAMING_MOVIES: &str = "StreamingMovies";
    pub const CONTRACT: &str = "Contract";
    pub const PAPERLESS_BILLING: &str = "PaperlessBilling";
    pub const PAYMENT_METHOD: &str = "PaymentMethod";
    pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
    pub const TOTAL_CHARGES: &str = "TotalCharges";
    pub const CHURN: &str = "Churn";

    pub const AVG_MONTHLY_SPEND: &str = "AvgMonthlySpend";
    pub const NO_ONLINE_SERVICES: &str = "NoOnlineServices";
    pub const NO_STREAMING: &str = "NoStreaming";
    pub const TOTAL_SERVICES: &str = "TotalServices";
    pub const RISK_SCORE: &str = "RiskScore";

    /// Identifying columns dropped before feature derivation.
    pub const DROPPED: [&str; 2] = [CUSTOMER_ID, GENDER];

    /// Numeric attributes accepted from a request.
    pub const NUMERIC_INPUTS: [&str; 4] = [SENIOR_CITIZEN, TENURE, MONTHLY_CHARGES, TOTAL_CHARGES];

    /// Categorical attributes accepted from a request.
    pub const CATEGORICAL_INPUTS: [&str; 14] = [
        PARTNER,
        DEPENDENTS,
        PHONE_SERVICE,
        MULTIPLE_LINES,
        INTERNET_SERVICE,
        ONLINE_SECURITY,
        ONLINE_BACKUP,
        DEVICE_PROTECTION,
        TECH_SUPPORT,
        STREAMING_TV,
        STREAMING_MOVIES,
        CONTRACT,
        PAPERLESS_BILLING,
        PAYMENT_METHOD,
    ];
}

/// One row of the raw customer table, every cell as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawCustomerRecord {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: String,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: String,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: String,
    #[serde(rename = "TotalCharges")]
    pub total_charges: String,
    #[serde(rename = "Churn", default)]
    pub churn: Option<String>,
}

impl RawCustomerRecord {
    /// Cells that decide whether two rows are duplicates.
    ///
    /// The identifying columns are dropped before deduplication, so two
    /// customers with identical attributes collapse into one row.
    pub fn content_key(&self) -> [&str; 19] {
        [
            &self.senior_citizen,
            &self.partner,
            &self.dependents,
            &self.tenure,
            &self.phone_service,
            &self.multiple_lines,
            &self.internet_service,
            &self.online_security,
            &self.online_backup,
            &self.device_protection,
            &self.tech_support,
            &self.streaming_tv,
            &self.streaming_movies,
            &self.contract,
            &self.paperless_billing,
            &self.payment_method,
            &self.monthly_charges,
            &self.total_charges,
            self.churn.as_deref().unwrap_or(""),
        ]
    }

    /// `TotalCharges` coerced to a number, `None` when unparsable.
    pub fn total_charges_value(&self) -> Option<f64> {
        self.total_charges.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Typed customer attributes with the identifying columns removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "SeniorCitizen", default)]
    pub senior_citizen: f64,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    #[serde(default)]
    pub tenure: f64,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges", default)]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges", default)]
    pub total_charges: f64,
    #[serde(rename = "Churn", default, skip_serializing_if = "Option::is_none")]
    pub churn: Option<String>,
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value < 0.0 {
        return Err(ChurnError::NegativeNumber { field: field.to_string(), value });
    }
    Ok(())
}

impl CustomerRecord {
    /// Reject numeric attributes no customer can have.
    ///
    /// `tenure`, `MonthlyCharges` and `TotalCharges` must be zero or more; a
    /// negative tenure would put a zero or negative divisor under `AvgMonthlySpend`.
    pub fn validate(&self) -> Result<()> {
        non_negative(columns::TENURE, self.tenure)?;
        non_negative(columns::MONTHLY_CHARGES, self.monthly_charges)?;
        non_negative(columns::TOTAL_CHARGES, self.total_charges)?;
        Ok(())
    }

    /// Build from a raw training row, replacing an unparsable `TotalCharges`
    /// with `total_charges_fill`.
    pub fn from_raw(raw: &RawCustomerRecord, total_charges_fill: f64) -> Result<Self> {
        let record = Self {
            senior_citizen: parse_number(columns::SENIOR_CITIZEN, &raw.senior_citizen)?,
            partner: raw.partner.clone(),
            dependents: raw.dependents.clone(),
            tenure: parse_number(columns::TENURE, &raw.tenure)?,
            phone_service: raw.phone_service.clone(),
            multiple_lines: raw.multiple_lines.clone(),
            internet_service: raw.internet_service.clone(),
            online_security: raw.online_security.clone(),
            online_backup: raw.online_backup.clone(),
            device_protection: raw.device_protection.clone(),
            tech_support: raw.tech_support.clone(),
            streaming_tv: raw.streaming_tv.clone(),
            streaming_movies: raw.streaming_movies.clone(),
            contract: raw.contract.clone(),
            paperless_billing: raw.paperless_billing.clone(),
            payment_method: raw.payment_method.clone(),
            monthly_charges: parse_number(columns::MONTHLY_CHARGES, &raw.monthly_charges)?,
            total_charges: raw.total_charges_value().unwrap_or(total_charges_fill),
            churn: raw.churn.clone(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Build from submitted form fields.
    ///
    /// Numeric fields that are absent or blank default to `0`. Categorical
    /// fields are required; their text is kept verbatim because vocabulary
    /// mismatches are resolved later by the encoder fallback.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self> {
        let number = |name: &str| -> Result<f64> {
            match fields.get(name).map(|v| v.trim()) {
                None | Some("") => Ok(0.0),
                Some(text) => parse_number(name, text),
            }
        };
        let text = |name: &str| -> Result<String> {
            fields
                .get(name)
                .map(|v| v.trim().to_string())
                .ok_or_else(|| ChurnError::MissingField { field: name.to_string() })
        };

        let record = Self {
            senior_citizen: number(columns::SENIOR_CITIZEN)?,
            partner: text(columns::PARTNER)?,
            dependents: text(columns::DEPENDENTS)?,
            tenure: number(columns::TENURE)?,
            phone_service: text(columns::PHONE_SERVICE)?,
            multiple_lines: text(columns::MULTIPLE_LINES)?,
            internet_service: text(columns::INTERNET_SERVICE)?,
            online_security: text(columns::ONLINE_SECURITY)?,
            online_backup: text(columns::ONLINE_BACKUP)?,
            device_protection: text(columns::DEVICE_PROTECTION)?,
            tech_support: text(columns::TECH_SUPPORT)?,
            streaming_tv: text(columns::STREAMING_TV)?,
            streaming_movies: text(columns::STREAMING_MOVIES)?,
            contract: text(columns::CONTRACT)?,
            paperless_billing: text(columns::PAPERLESS_BILLING)?,
            payment_method: text(columns::PAYMENT_METHOD)?,
            monthly_charges: number(columns::MONTHLY_CHARGES)?,
            total_charges: number(columns::TOTAL_CHARGES)?,
            churn: None,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Parse numeric text: a decimal point selects float parsing, otherwise integer.
pub fn parse_number(field: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let malformed = || ChurnError::MalformedNumber {
        field: field.to_string(),
        value: text.to_string(),
    };

    if trimmed.contains('.') {
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(malformed)
    } else {
        trimmed.parse::<i64>().map(|v| v as f64).map_err(|_| malformed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    fn full_form() -> HashMap<String, String> {
        let mut fields =
            form(&[("tenure", "12"), ("MonthlyCharges", "70.35"), ("TotalCharges", "840.5")]);
        for name in columns::CATEGORICAL_INPUTS {
            fields.insert(name.to_string(), "No".to_string());
        }
        fields
    }

    #[test]
    fn test_parse_number_integer_and_float() {
        assert_eq!(parse_number("tenure", "12").unwrap(), 12.0);
        assert_eq!(parse_number("MonthlyCharges", "70.35").unwrap(), 70.35);
        assert_eq!(parse_number("tenure", " 7 ").unwrap(), 7.0);
    }

    #[test]
    fn test_parse_number_malformed() {
        let err = parse_number("tenure", "12a").unwrap_err();
        assert!(matches!(err, ChurnError::MalformedNumber { ref field, .. } if field == "tenure"));
        assert!(parse_number("TotalCharges", "1.2.3").is_err());
        assert!(parse_number("TotalCharges", "nan.").is_err());
    }

    #[test]
    fn test_from_form_defaults_missing_numbers_to_zero() {
        let mut fields = full_form();
        fields.remove("TotalCharges");
        fields.insert("tenure".into(), "".into());

        let record = CustomerRecord::from_form(&fields).unwrap();
        assert_eq!(record.total_charges, 0.0);
        assert_eq!(record.tenure, 0.0);
        assert_eq!(record.monthly_charges, 70.35);
        assert!(record.churn.is_none());
    }

    #[test]
    fn test_from_form_requires_categoricals() {
        let mut fields = full_form();
        fields.remove("Contract");

        let err = CustomerRecord::from_form(&fields).unwrap_err();
        assert!(matches!(err, ChurnError::MissingField { ref field } if field == "Contract"));
    }

    #[test]
    fn test_from_form_rejects_malformed_number() {
        let mut fields = full_form();
        fields.insert("MonthlyCharges".into(), "seventy".into());
        assert!(CustomerRecord::from_form(&fields).unwrap_err().is_request_error());
    }

    #[test]
    fn test_from_form_rejects_negative_tenure() {
        let mut fields = full_form();
        fields.insert("tenure".into(), "-1".into());
        fields.insert("TotalCharges".into(), "0".into());

        let err = CustomerRecord::from_form(&fields).unwrap_err();
        assert!(matches!(
            err,
            ChurnError::NegativeNumber { ref field, value } if field == "tenure" && value == -1.0
        ));
        assert!(err.is_request_error());
    }

    #[test]
    fn test_total_charges_value_blank_is_none() {
        let raw = RawCustomerRecord {
            customer_id: "0001".into(),
            gender: "Female".into(),
            senior_citizen: "0".into(),
            partner: "Yes".into(),
            dependents: "No".into(),
            tenure: "0".into(),
            phone_service: "Yes".into(),
            multiple_lines: "No".into(),
            internet_service: "DSL".into(),
            online_security: "No".into(),
            online_backup: "No".into(),
            device_protection: "No".into(),
            tech_support: "No".into(),
            streaming_tv: "No".into(),
            streaming_movies: "No".into(),
            contract: "Two year".into(),
            paperless_billing: "Yes".into(),
            payment_method: "Mailed check".into(),
            monthly_charges: "52.55".into(),
            total_charges: " ".into(),
            churn: Some("No".into()),
        };
        assert!(raw.total_charges_value().is_none());

        let record = CustomerRecord::from_raw(&raw, 1397.475).unwrap();
        assert_eq!(record.total_charges, 1397.475);
        assert_eq!(record.churn.as_deref(), Some("No"));
    }

    #[test]
    fn test_content_key_ignores_identity_columns() {
        let a = RawCustomerRecord {
            customer_id: "a".into(),
            gender: "Male".into(),
            senior_citizen: "0".into(),
            partner: "No".into(),
            dependents: "No".into(),
            tenure: "1".into(),
            phone_service: "No".into(),
            multiple_lines: "No phone service".into(),
            internet_service: "DSL".into(),
            online_security: "No".into(),
            online_backup: "Yes".into(),
            device_protection: "No".into(),
            tech_support: "No".into(),
            streaming_tv: "No".into(),
            streaming_movies: "No".into(),
            contract: "Month-to-month".into(),
            paperless_billing: "Yes".into(),
            payment_method: "Electronic check".into(),
            monthly_charges: "29.85".into(),
            total_charges: "29.85".into(),
            churn: Some("No".into()),
        };
        let b = RawCustomerRecord { customer_id: "b".into(), gender: "Female".into(), ..a.clone() };
        assert_ne!(a, b);
        assert_eq!(a.content_key(), b.content_key());
    }
}
