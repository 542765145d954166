//! Tests for frame decoding

use bytes::{BufMut, Bytes, BytesMut};

use super::*;
use crate::{ByteArena, ColumnTag};

fn closed_frame(identity: StreamIdentity, rows: &[&[u8]], digestion_id: u64) -> Bytes {
    let mut arena = ByteArena::new(identity, 1024).unwrap();
    for row in rows {
        assert!(arena.put(row).unwrap());
    }
    arena.close(digestion_id).unwrap();
    Bytes::copy_from_slice(arena.frame())
}

fn rich_identity() -> StreamIdentity {
    StreamIdentity::builder("nginx.access")
        .file_prefix_pattern("/var/log/nginx/access-*")
        .client_hostname("edge-\u{00E9}1")
        .typed_column("ts", &[ColumnTag::Timestamp])
        .typed_column("paths", &[ColumnTag::List, ColumnTag::String])
        .typed_column("\u{65E5}", &[ColumnTag::Map, ColumnTag::String, ColumnTag::Long])
        .property("region", "eu-west-1")
        .property("tier", "gold")
        .build()
        .unwrap()
}

// =============================================================================
// Successful decoding
// =============================================================================

#[test]
fn test_decode_closed_arena() {
    let identity = rich_identity();
    let mut buf = closed_frame(identity.clone(), &[b"row-1", b"row-2"], 42);

    let frame = DecodedFrame::decode(&mut buf).unwrap();

    assert_eq!(frame.digestion_id, 42);
    assert_eq!(frame.identity, identity);
    assert_eq!(frame.identity.client_hostname(), "edge-\u{00E9}1");
    assert_eq!(frame.identity.headers(), identity.headers());
    assert_eq!(frame.identity.column_types(), identity.column_types());
    assert_eq!(frame.identity.properties(), identity.properties());
    assert_eq!(&frame.payload[..], b"row-1row-2");
    assert_eq!(frame.row_length(), 10);
    assert!(buf.is_empty());
}

#[test]
fn test_decode_empty_row_region() {
    let mut buf = closed_frame(rich_identity(), &[], 1);
    let frame = DecodedFrame::decode(&mut buf).unwrap();
    assert!(frame.payload.is_empty());
}

#[test]
fn test_decode_leaves_following_frame_in_buffer() {
    let first = closed_frame(rich_identity(), &[b"a"], 1);
    let second = closed_frame(rich_identity(), &[b"b"], 2);

    let mut joined = BytesMut::new();
    joined.put_slice(&first);
    joined.put_slice(&second);
    let mut buf = joined.freeze();

    let one = DecodedFrame::decode(&mut buf).unwrap();
    let two = DecodedFrame::decode(&mut buf).unwrap();

    assert_eq!((one.digestion_id, &one.payload[..]), (1, &b"a"[..]));
    assert_eq!((two.digestion_id, &two.payload[..]), (2, &b"b"[..]));
    assert!(buf.is_empty());
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn test_truncated_at_every_cut_point() {
    let full = closed_frame(rich_identity(), &[b"payload"], 9);

    for cut in 0..full.len() {
        let mut buf = full.slice(..cut);
        let err = DecodedFrame::decode(&mut buf).unwrap_err();
        assert!(err.is_truncated(), "cut at {cut}: {err}");
    }
}

#[test]
fn test_truncated_reports_field() {
    let mut buf = Bytes::from_static(&[0u8; 5]);
    let err = DecodedFrame::decode(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::Truncated {
            field: "reserved header",
            needed: 12,
            remaining: 5
        }
    ));
}

#[test]
fn test_negative_row_length() {
    let mut raw = BytesMut::new();
    raw.put_u64(1);
    raw.put_i32(-1);
    let mut buf = raw.freeze();

    let err = DecodedFrame::decode(&mut buf).unwrap_err();
    assert!(matches!(err, ProtocolError::NegativeLength { value: -1, .. }));
    assert!(!err.is_truncated());
}

#[test]
fn test_negative_header_count() {
    let mut raw = BytesMut::new();
    raw.put_u64(1);
    raw.put_i32(0);
    for _ in 0..3 {
        raw.put_u16(0);
    }
    raw.put_i32(-5);
    let mut buf = raw.freeze();

    let err = DecodedFrame::decode(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::NegativeLength {
            field: "header count",
            value: -5
        }
    ));
}

#[test]
fn test_malformed_string() {
    let mut raw = BytesMut::new();
    raw.put_u64(1);
    raw.put_i32(0);
    raw.put_u16(1);
    raw.put_u8(0xFF);
    let mut buf = raw.freeze();

    let err = DecodedFrame::decode(&mut buf).unwrap_err();
    assert!(matches!(err, ProtocolError::MalformedUtf { .. }));
}
