//! Tests for StreamIdentity

use std::collections::HashSet;

use super::*;

fn access_log(hostname: &str) -> StreamIdentity {
    StreamIdentity::builder("access")
        .file_prefix_pattern("access-*")
        .client_hostname(hostname)
        .typed_column("ts", &[ColumnTag::Timestamp])
        .typed_column("tags", &[ColumnTag::List, ColumnTag::String])
        .property("env", "prod")
        .build()
        .unwrap()
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn test_equality_ignores_hostname() {
    let a = access_log("web-1");
    let b = access_log("web-2");

    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn test_with_hostname_keeps_equality() {
    let a = access_log("web-1");
    let b = a.with_hostname("web-9");
    assert_eq!(b.client_hostname(), "web-9");
    assert_eq!(a, b);
}

#[test]
fn test_properties_participate_in_equality() {
    let a = access_log("web-1");
    let b = StreamIdentity::builder("access")
        .file_prefix_pattern("access-*")
        .client_hostname("web-1")
        .typed_column("ts", &[ColumnTag::Timestamp])
        .typed_column("tags", &[ColumnTag::List, ColumnTag::String])
        .property("env", "staging")
        .build()
        .unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_column_types_participate_in_equality() {
    let a = StreamIdentity::builder("app")
        .typed_column("v", &[ColumnTag::String])
        .build()
        .unwrap();
    let b = StreamIdentity::builder("app")
        .typed_column("v", &[ColumnTag::Long])
        .build()
        .unwrap();
    assert_ne!(a, b);
}

// =============================================================================
// Header length
// =============================================================================

#[test]
fn test_header_len_minimal() {
    let identity = StreamIdentity::builder("").build().unwrap();
    // 12 reserved + 3 empty strings + header count + property count
    assert_eq!(identity.header_len(), 12 + 6 + 4 + 1);
}

#[test]
fn test_header_len_counts_every_field() {
    let identity = StreamIdentity::builder("t")
        .file_prefix_pattern("p")
        .client_hostname("h")
        .typed_column("v", &[ColumnTag::String])
        .property("k", "vv")
        .build()
        .unwrap();
    // 12 + (3 + 3 + 3) + 4 + 3 + (1 + 1) + 1 + (3 + 4)
    assert_eq!(identity.header_len(), 38);
}

// =============================================================================
// Builder validation
// =============================================================================

#[test]
fn test_builder_rejects_long_string() {
    let err = StreamIdentity::builder("x".repeat(70_000)).build().unwrap_err();
    assert!(matches!(err, ProtocolError::StringTooLong { len: 70_000, .. }));
}

#[test]
fn test_builder_rejects_too_many_tags() {
    let err = StreamIdentity::builder("app")
        .column("v", vec![5u8; 256])
        .build()
        .unwrap_err();
    assert!(matches!(err, ProtocolError::TooManyTags { count: 256, .. }));
}

#[test]
fn test_builder_rejects_too_many_properties() {
    let mut builder = StreamIdentity::builder("app");
    for i in 0..256 {
        builder = builder.property(format!("k{i}"), "v");
    }
    let err = builder.build().unwrap_err();
    assert!(matches!(err, ProtocolError::TooManyProperties { count: 256 }));
}

#[test]
fn test_display() {
    assert_eq!(access_log("h").to_string(), "access:access-*");
    let bare = StreamIdentity::builder("app").build().unwrap();
    assert_eq!(bare.to_string(), "app");
}
