//! Tests for error types

use experiment_combinators::record::Section;
use experiment_combinators::Error;

#[test]
fn test_missing_status_error() {
    let error = Error::MissingStatus;
    let error_str = format!("{error}");
    assert!(error_str.contains("Malformed record"));
    assert!(error_str.contains("status"));
    assert!(error.is_contract_violation());
}

#[test]
fn test_invalid_status_error() {
    let error = Error::InvalidStatus {
        found: "\"yes\"".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("must be a boolean"));
    assert!(error_str.contains("\"yes\""));
    assert!(error.is_contract_violation());
}

#[test]
fn test_missing_field_error() {
    let error = Error::MissingField {
        section: Section::Results,
        field: "loss".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("results field `loss` is missing"));
    assert!(error.is_contract_violation());
}

#[test]
fn test_non_numeric_field_error() {
    let error = Error::NonNumericField {
        section: Section::Metadata,
        field: "elapsed_time".to_string(),
        found: "true".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("metadata field `elapsed_time` is not numeric"));
    assert!(error_str.contains("found true"));
    assert!(error.is_contract_violation());
}

#[test]
fn test_invalid_repetitions_error() {
    let error = Error::InvalidRepetitions(0);
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid repetition count: 0"));
    assert!(error_str.contains("at least one repetition"));
    assert!(!error.is_contract_violation());
}

#[test]
fn test_poisoned_error() {
    let error = Error::Poisoned;
    assert!(format!("{error}").contains("lock poisoned"));
    assert!(!error.is_contract_violation());
}

#[test]
fn test_config_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("Configuration error"));
}

#[test]
fn test_poison_error_conversion() {
    let lock = std::sync::Mutex::new(0);
    let _ = std::panic::catch_unwind(|| {
        let _guard = lock.lock().unwrap();
        panic!("poison the lock");
    });
    let error: Error = lock.lock().unwrap_err().into();
    assert!(matches!(error, Error::Poisoned));
}

#[test]
fn test_error_debug() {
    let error = Error::MissingStatus;
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("MissingStatus"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> experiment_combinators::Result<i32> {
        Err(Error::InvalidRepetitions(0))
    }

    let result = returns_error();
    assert!(result.is_err());
}
