//! Receiver metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for the receiver
#[derive(Debug, Default)]
pub struct ReceiverMetrics {
    /// Frames decoded and handed to the listener
    frames_received: AtomicU64,

    /// Row bytes handed to the listener
    bytes_received: AtomicU64,

    /// Frames refused for an unsupported version
    invalid_version: AtomicU64,

    /// Frames refused because the listener was unavailable
    sink_unavailable: AtomicU64,

    /// Frames cut short (peer disconnected)
    truncated: AtomicU64,

    /// Malformed frames
    decode_errors: AtomicU64,
}

impl ReceiverMetrics {
    pub const fn new() -> Self {
        Self {
            frames_received: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            invalid_version: AtomicU64::new(0),
            sink_unavailable: AtomicU64::new(0),
            truncated: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_frame(&self, bytes: usize) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_invalid_version(&self) {
        self.invalid_version.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sink_unavailable(&self) {
        self.sink_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_truncated(&self) {
        self.truncated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ReceiverMetricsSnapshot {
        ReceiverMetricsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            invalid_version: self.invalid_version.load(Ordering::Relaxed),
            sink_unavailable: self.sink_unavailable.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of receiver metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReceiverMetricsSnapshot {
    pub frames_received: u64,
    pub bytes_received: u64,
    pub invalid_version: u64,
    pub sink_unavailable: u64,
    pub truncated: u64,
    pub decode_errors: u64,
}

impl ReceiverMetricsSnapshot {
    /// Frames refused without decoding
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.invalid_version + self.sink_unavailable
    }

    /// Frames that failed to decode
    #[inline]
    pub fn errors(&self) -> u64 {
        self.truncated + self.decode_errors
    }
}
