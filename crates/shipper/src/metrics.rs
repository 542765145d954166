//! Shipper metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for the shipper
#[derive(Debug, Default)]
pub struct ShipperMetrics {
    /// Arenas accepted by the transport
    arenas_sent: AtomicU64,

    /// Frame bytes accepted by the transport
    bytes_sent: AtomicU64,

    /// Transport send errors that requeued arenas
    send_failures: AtomicU64,

    /// Frames the peer refused for good; released without resending
    frames_rejected: AtomicU64,

    /// Unforced rounds that did not send (closed or transport unhealthy)
    skipped_rounds: AtomicU64,
}

impl ShipperMetrics {
    pub const fn new() -> Self {
        Self {
            arenas_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
            frames_rejected: AtomicU64::new(0),
            skipped_rounds: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_sent(&self, bytes: usize) {
        self.arenas_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_skipped(&self) {
        self.skipped_rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ShipperMetricsSnapshot {
        ShipperMetricsSnapshot {
            arenas_sent: self.arenas_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            skipped_rounds: self.skipped_rounds.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of shipper metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShipperMetricsSnapshot {
    pub arenas_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
    pub frames_rejected: u64,
    pub skipped_rounds: u64,
}
