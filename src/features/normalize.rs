//! Canonicalization tables applied before derivation.
//!
//! Both tables map their own outputs back to themselves, so normalizing a value
//! that is already canonical (as every row of the training table is) is a no-op.

/// Canonical label for a customer without internet service.
pub const NO_INTERNET_SERVICE: &str = "No internet service";

/// Canonical label for a customer without phone service.
pub const NO_PHONE_SERVICE: &str = "No phone service";

/// Values counted as an active service by `TotalServices`.
pub const ACTIVE_SERVICE_VALUES: [&str; 3] = ["Yes", "Fiber optic", "DSL"];

/// Canonicalize an `InternetService` value. Unknown text becomes `"No"`.
pub fn internet_service(value: &str) -> &'static str {
    match value {
        "DSL" => "DSL",
        "Fiber Optic" | "Fiber optic" => "Fiber optic",
        "No" | NO_INTERNET_SERVICE => NO_INTERNET_SERVICE,
        _ => "No",
    }
}

/// Canonicalize a yes/no-family value. Unknown text becomes `"No"`.
///
/// The two localized "no service" phrasings collapse into the internet variant.
pub fn yes_no(value: &str) -> &'static str {
    match value {
        "No" => "No",
        "Yes" => "Yes",
        NO_INTERNET_SERVICE | "Sem serviço de telefone" | "Sem serviço de internet" => {
            NO_INTERNET_SERVICE
        }
        _ => "No",
    }
}

/// Whether a canonical value is excluded from service counting altogether.
pub fn is_no_service(value: &str) -> bool {
    value.contains(NO_INTERNET_SERVICE) || value.contains(NO_PHONE_SERVICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internet_service_table() {
        assert_eq!(internet_service("DSL"), "DSL");
        assert_eq!(internet_service("Fiber Optic"), "Fiber optic");
        assert_eq!(internet_service("No"), NO_INTERNET_SERVICE);
        assert_eq!(internet_service("satellite"), "No");
        assert_eq!(internet_service(""), "No");
    }

    #[test]
    fn test_yes_no_table() {
        assert_eq!(yes_no("Yes"), "Yes");
        assert_eq!(yes_no("No"), "No");
        assert_eq!(yes_no(NO_INTERNET_SERVICE), NO_INTERNET_SERVICE);
        assert_eq!(yes_no("Sem serviço de telefone"), NO_INTERNET_SERVICE);
        assert_eq!(yes_no("Sem serviço de internet"), NO_INTERNET_SERVICE);
        assert_eq!(yes_no("yes"), "No");
        assert_eq!(yes_no(NO_PHONE_SERVICE), "No");
    }

    #[test]
    fn test_tables_are_idempotent() {
        for raw in ["DSL", "Fiber Optic", "Fiber optic", "No", "cable", NO_INTERNET_SERVICE] {
            let once = internet_service(raw);
            assert_eq!(internet_service(once), once, "internet_service({raw:?})");
        }
        for raw in ["Yes", "No", "Sem serviço de internet", "maybe", NO_INTERNET_SERVICE] {
            let once = yes_no(raw);
            assert_eq!(yes_no(once), once, "yes_no({raw:?})");
        }
    }

    #[test]
    fn test_is_no_service() {
        assert!(is_no_service(NO_INTERNET_SERVICE));
        assert!(is_no_service(NO_PHONE_SERVICE));
        assert!(!is_no_service("No"));
        assert!(!is_no_service("Fiber optic"));
    }
}
