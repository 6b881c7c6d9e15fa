#![allow(clippy::unwrap_used, clippy::expect_used)]

use sitelog_core::*;

// ---------------------------------------------------------------------------
// 1. ValidationResult wire shape
// ---------------------------------------------------------------------------

#[test]
fn validation_result_wire_shape() {
    let rejected = ValidationResult::invalid("File too large. Maximum 10MB allowed.");
    let json = serde_json::to_value(&rejected).unwrap();
    assert_eq!(json["isValid"], serde_json::Value::Bool(false));
    assert_eq!(json["message"], "File too large. Maximum 10MB allowed.");

    let parsed: ValidationResult = serde_json::from_str(r#"{"isValid":true}"#).unwrap();
    assert_eq!(parsed, ValidationResult::valid());
}

#[test]
fn validation_result_rejection_without_message_does_not_parse() {
    assert!(serde_json::from_str::<ValidationResult>(r#"{"isValid":false}"#).is_err());
    assert!(serde_json::from_str::<ValidationResult>(r#"{"isValid":false,"message":null}"#).is_err());
}

// ---------------------------------------------------------------------------
// 2. Error conversions and display
// ---------------------------------------------------------------------------

#[test]
fn error_from_serde_json() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: SitelogError = err.into();
    assert!(matches!(err, SitelogError::Json(_)));
    assert!(err.to_string().starts_with("JSON error:"));
}

#[test]
fn error_from_io() {
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: SitelogError = err.into();
    assert_eq!(err.to_string(), "IO error: missing");
}

#[test]
fn error_display_variants() {
    assert_eq!(
        SitelogError::Security("rng".into()).to_string(),
        "Security error: rng"
    );
    assert_eq!(
        SitelogError::Config("bad".into()).to_string(),
        "Config error: bad"
    );
}

fn returns_result(ok: bool) -> SitelogResult<u8> {
    if ok {
        Ok(1)
    } else {
        Err(SitelogError::Config("off".into()))
    }
}

#[test]
fn result_alias_propagates() {
    assert_eq!(returns_result(true).unwrap(), 1);
    assert!(returns_result(false).is_err());
}
