//! Pipeline metrics
//!
//! Atomic counters for the arena pool and the arena manager.
//! All operations use relaxed ordering; values are eventually consistent.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the arena pool
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Acquires served from the free list
    hits: AtomicU64,

    /// Acquires that had to allocate
    misses: AtomicU64,

    /// Arenas handed back to the pool
    returns: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_return(&self) {
        self.returns.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of metrics
    pub fn snapshot(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pool metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
}

impl PoolMetricsSnapshot {
    /// Fraction of acquires served without allocating (0.0 - 1.0)
    ///
    /// Returns None if nothing was acquired yet.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f64 / total as f64)
        }
    }
}

/// Metrics for the arena manager
///
/// # Thread Safety
///
/// Safe to call from every producer thread concurrently.
#[derive(Debug, Default)]
pub struct ManagerMetrics {
    /// Rows appended
    rows_written: AtomicU64,

    /// Payload bytes appended
    bytes_written: AtomicU64,

    /// Rows refused as larger than any arena of their stream
    rows_rejected: AtomicU64,

    /// Arenas enqueued because the next row did not fit
    rollovers: AtomicU64,

    /// Arenas closed and enqueued (rollover or flush)
    arenas_enqueued: AtomicU64,
}

impl ManagerMetrics {
    pub const fn new() -> Self {
        Self {
            rows_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            rows_rejected: AtomicU64::new(0),
            rollovers: AtomicU64::new(0),
            arenas_enqueued: AtomicU64::new(0),
        }
    }

    /// Record a row appended to an arena
    #[inline]
    pub fn record_row(&self, bytes: usize) {
        self.rows_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self) {
        self.rows_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rollover(&self) {
        self.rollovers.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_enqueued(&self, count: usize) {
        self.arenas_enqueued.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> ManagerMetricsSnapshot {
        ManagerMetricsSnapshot {
            rows_written: self.rows_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            rows_rejected: self.rows_rejected.load(Ordering::Relaxed),
            rollovers: self.rollovers.load(Ordering::Relaxed),
            arenas_enqueued: self.arenas_enqueued.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of manager metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManagerMetricsSnapshot {
    pub rows_written: u64,
    pub bytes_written: u64,
    pub rows_rejected: u64,
    pub rollovers: u64,
    pub arenas_enqueued: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_hit_rate() {
        let metrics = PoolMetrics::new();
        assert_eq!(metrics.snapshot().hit_rate(), None);

        metrics.record_miss();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.snapshot().hit_rate(), Some(0.75));
    }

    #[test]
    fn test_manager_counters() {
        let metrics = ManagerMetrics::new();
        metrics.record_row(10);
        metrics.record_row(5);
        metrics.record_rollover();
        metrics.record_enqueued(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.rows_written, 2);
        assert_eq!(snap.bytes_written, 15);
        assert_eq!(snap.rollovers, 1);
        assert_eq!(snap.arenas_enqueued, 3);
        assert_eq!(snap.rows_rejected, 0);
    }
}
