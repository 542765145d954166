//! Tests for protocol error types

use crate::error::ProtocolError;

#[test]
fn test_error_creation_header_too_large() {
    let err = ProtocolError::header_too_large(120, 64);
    assert!(matches!(
        err,
        ProtocolError::HeaderTooLarge {
            required: 120,
            capacity: 64
        }
    ));
}

#[test]
fn test_error_creation_string_too_long() {
    let err = ProtocolError::string_too_long(70_000);
    assert!(matches!(
        err,
        ProtocolError::StringTooLong {
            len: 70_000,
            max: 65_535
        }
    ));
}

#[test]
fn test_error_creation_truncated() {
    let err = ProtocolError::truncated("log type", 10, 3);
    assert!(err.is_truncated());
    assert!(err.to_string().contains("log type"));
}

#[test]
fn test_fatal_config_classification() {
    assert!(ProtocolError::header_too_large(1, 0).is_fatal_config());
    assert!(ProtocolError::string_too_long(1).is_fatal_config());
    assert!(ProtocolError::TooManyProperties { count: 300 }.is_fatal_config());

    assert!(!ProtocolError::ArenaClosed { digestion_id: 1 }.is_fatal_config());
    assert!(!ProtocolError::truncated("x", 1, 0).is_fatal_config());
    assert!(!ProtocolError::InvalidUtf16.is_fatal_config());
}

#[test]
fn test_truncated_is_not_malformed() {
    assert!(!ProtocolError::MalformedUtf { offset: 0 }.is_truncated());
    assert!(!ProtocolError::NegativeLength { field: "row length", value: -1 }.is_truncated());
}

#[test]
fn test_display_messages() {
    let err = ProtocolError::ArenaInUse { data_length: 12 };
    assert!(err.to_string().contains("12 bytes"));

    let err = ProtocolError::TooManyTags {
        column: "paths".into(),
        count: 300,
    };
    assert!(err.to_string().contains("paths"));
}
