//! Receiver tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use bytes::{BufMut, Bytes, BytesMut};
use logship_protocol::{
    ByteArena, ColumnTag, DecodedFrame, PROTOCOL_V1, PROTOCOL_V2, StreamIdentity,
};
use parking_lot::Mutex;

use crate::{Listener, ProtocolStatus, Receiver, ReceiverError};

/// Collects frames; availability and the returned status are adjustable
struct RecordingListener {
    available: AtomicBool,
    availability_checks: AtomicUsize,
    status: Mutex<ProtocolStatus>,
    frames: Mutex<Vec<DecodedFrame>>,
}

impl RecordingListener {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            availability_checks: AtomicUsize::new(0),
            status: Mutex::new(ProtocolStatus::Ok),
            frames: Mutex::new(Vec::new()),
        })
    }
}

impl Listener for RecordingListener {
    fn is_available(&self) -> bool {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.available.load(Ordering::SeqCst)
    }

    fn on_frame(&self, frame: DecodedFrame) -> ProtocolStatus {
        self.frames.lock().push(frame);
        *self.status.lock()
    }
}

fn identity() -> StreamIdentity {
    StreamIdentity::builder("nginx")
        .file_prefix_pattern("access-*")
        .client_hostname("web-1")
        .typed_column("line", &[ColumnTag::String])
        .property("env", "prod")
        .build()
        .unwrap()
}

fn frame(rows: &[&[u8]], digestion_id: u64) -> Bytes {
    let mut arena = ByteArena::new(identity(), 512).unwrap();
    for row in rows {
        assert!(arena.put(row).unwrap());
    }
    arena.close(digestion_id).unwrap();
    Bytes::copy_from_slice(arena.frame())
}

fn setup() -> (Arc<RecordingListener>, Receiver) {
    let listener = RecordingListener::new();
    let receiver = Receiver::new(listener.clone());
    (listener, receiver)
}

// =============================================================================
// Accepted frames
// =============================================================================

#[test]
fn test_receive_decodes_and_forwards() {
    let (listener, receiver) = setup();

    let status = receiver.receive(PROTOCOL_V2, frame(&[b"GET /", b"POST /x"], 9)).unwrap();
    assert_eq!(status, ProtocolStatus::Ok);

    let frames = listener.frames.lock();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].digestion_id, 9);
    assert_eq!(frames[0].identity, identity());
    assert_eq!(frames[0].identity.client_hostname(), "web-1");
    assert_eq!(&frames[0].payload[..], b"GET /POST /x");

    let metrics = receiver.metrics();
    assert_eq!(metrics.frames_received, 1);
    assert_eq!(metrics.bytes_received, 12);
}

#[test]
fn test_versions_share_layout() {
    let (listener, receiver) = setup();

    assert!(receiver.receive(PROTOCOL_V1, frame(&[b"a"], 1)).unwrap().is_ok());
    assert!(receiver.receive(PROTOCOL_V2, frame(&[b"a"], 1)).unwrap().is_ok());

    let frames = listener.frames.lock();
    assert_eq!(frames[0].identity, frames[1].identity);
    assert_eq!(frames[0].payload, frames[1].payload);
}

#[test]
fn test_empty_row_region() {
    let (listener, receiver) = setup();
    assert!(receiver.receive(PROTOCOL_V2, frame(&[], 4)).unwrap().is_ok());
    assert!(listener.frames.lock()[0].payload.is_empty());
}

#[test]
fn test_trailing_bytes_ignored() {
    let (listener, receiver) = setup();
    let mut buf = BytesMut::from(&frame(&[b"row"], 2)[..]);
    buf.put_slice(b"garbage");

    assert!(receiver.receive(PROTOCOL_V2, buf.freeze()).unwrap().is_ok());
    assert_eq!(&listener.frames.lock()[0].payload[..], b"row");
}

#[test]
fn test_listener_status_is_relayed() {
    let (listener, receiver) = setup();
    *listener.status.lock() = ProtocolStatus::SinkUnavailable;

    let status = receiver.receive(PROTOCOL_V2, frame(&[b"row"], 1)).unwrap();
    assert_eq!(status, ProtocolStatus::SinkUnavailable);
    assert_eq!(receiver.metrics().frames_received, 0);
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_unsupported_version_untouched() {
    let (listener, receiver) = setup();

    // Not a frame at all: decoding would fail
    let status = receiver.receive(99, Bytes::from_static(b"\xff")).unwrap();
    assert_eq!(status, ProtocolStatus::InvalidVersion);
    assert_eq!(listener.availability_checks.load(Ordering::SeqCst), 0);
    assert!(listener.frames.lock().is_empty());

    assert_eq!(
        receiver.receive(0, Bytes::new()).unwrap(),
        ProtocolStatus::InvalidVersion
    );
    assert_eq!(receiver.metrics().invalid_version, 2);
}

#[test]
fn test_sink_unavailable_before_decode() {
    let (listener, receiver) = setup();
    listener.available.store(false, Ordering::SeqCst);

    // Truncated input would otherwise be an error
    let status = receiver.receive(PROTOCOL_V2, Bytes::from_static(b"\x00")).unwrap();
    assert_eq!(status, ProtocolStatus::SinkUnavailable);
    assert!(listener.frames.lock().is_empty());
    assert_eq!(receiver.metrics().sink_unavailable, 1);
    assert_eq!(receiver.metrics().rejected(), 1);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_truncated_frame_is_connection_closed() {
    let (listener, receiver) = setup();
    let full = frame(&[b"some row"], 3);

    for cut in [0, 5, 12, 20, full.len() - 1] {
        let err = receiver.receive(PROTOCOL_V2, full.slice(..cut)).unwrap_err();
        assert!(err.is_connection_closed(), "cut at {cut}: {err}");
    }
    assert!(listener.frames.lock().is_empty());
    assert_eq!(receiver.metrics().truncated, 5);
}

#[test]
fn test_negative_row_length_is_protocol_error() {
    let (_listener, receiver) = setup();
    let mut buf = BytesMut::from(&frame(&[b"row"], 3)[..]);
    buf[8..12].copy_from_slice(&(-1i32).to_be_bytes());

    let err = receiver.receive(PROTOCOL_V2, buf.freeze()).unwrap_err();
    assert!(matches!(err, ReceiverError::Protocol(_)));
    assert_eq!(receiver.metrics().decode_errors, 1);
    assert_eq!(receiver.metrics().errors(), 1);
}

#[test]
fn test_malformed_string_is_protocol_error() {
    let (_listener, receiver) = setup();
    let mut buf = BytesMut::from(&frame(&[b"row"], 3)[..]);
    // First byte of the prefix pattern body becomes a stray continuation byte
    buf[14] = 0x80;

    let err = receiver.receive(PROTOCOL_V2, buf.freeze()).unwrap_err();
    assert!(matches!(err, ReceiverError::Protocol(_)));
}
