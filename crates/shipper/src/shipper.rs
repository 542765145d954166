//! Shipper - drains ready arenas through a transport
//!
//! # Design
//!
//! - A timer task calls `send_now(false)` every `flush_interval`
//! - Rounds are serialized; a round started by the timer always runs to
//!   completion, even when `close()` cancels the timer meanwhile
//! - While the transport reports `Failed`, unforced rounds only flush, so
//!   rows stay buffered and the ready queue grows into backpressure
//! - On a transient send error the failing arena and everything after it go
//!   back to the head of the ready queue; nothing is retried here
//! - `close()` stops the timer, flushes and makes one forced send; it only
//!   becomes a no-op after that send went through
//! - Frames the peer rejects for good are dropped with an error log, so
//!   they cannot wedge the queue; other send errors requeue

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use logship_config::ShipperConfig;
use logship_pipeline::ArenaManager;
use logship_protocol::BINARY_LOG_TYPE_TAG;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::availability::{Availability, FailureCauses};
use crate::error::{Result, ShipperError};
use crate::metrics::{ShipperMetrics, ShipperMetricsSnapshot};
use crate::transport::Transport;

/// State shared with the timer task
struct Inner {
    manager: Arc<ArenaManager>,
    transport: Arc<dyn Transport>,
    protocol_version: u16,
    max_ready_entries: usize,
    closed: AtomicBool,
    /// Set once the final forced send of `close()` succeeded
    drained: AtomicBool,
    rounds: tokio::sync::Mutex<()>,
    metrics: ShipperMetrics,
}

/// Ships closed arenas from an `ArenaManager` through a `Transport`
pub struct Shipper {
    inner: Arc<Inner>,
    cancel: CancellationToken,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Shipper {
    /// Create a shipper and start its timer
    ///
    /// Must be called inside a tokio runtime when the timer is enabled.
    pub fn start(
        manager: Arc<ArenaManager>,
        transport: Arc<dyn Transport>,
        config: &ShipperConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            manager,
            transport,
            protocol_version: config.protocol_version,
            max_ready_entries: config.max_ready_entries,
            closed: AtomicBool::new(false),
            drained: AtomicBool::new(false),
            rounds: tokio::sync::Mutex::new(()),
            metrics: ShipperMetrics::new(),
        });
        let cancel = CancellationToken::new();

        let timer = config.flush_interval().map(|period| {
            tokio::spawn(run_timer(Arc::clone(&inner), period, cancel.clone()))
        });

        info!(
            transport = inner.transport.name(),
            flush_interval_ms = config.flush_interval_ms,
            max_ready_entries = config.max_ready_entries,
            protocol_version = config.protocol_version,
            "shipper started"
        );

        Self {
            inner,
            cancel,
            timer: Mutex::new(timer),
        }
    }

    /// Run one shipping round now
    ///
    /// Skipped once closed unless `forced`. Returns the number of arenas the
    /// transport accepted.
    ///
    /// # Errors
    ///
    /// `Send` if the transport failed transiently (the unsent arenas are
    /// requeued), `Pipeline` if flushing failed. Frames rejected for good
    /// are dropped and counted instead.
    pub async fn send_now(&self, forced: bool) -> Result<usize> {
        self.inner.send_now(forced).await
    }

    /// Stop the timer, flush and make one final forced send
    ///
    /// Once a close has delivered everything, later calls return `Ok(())`
    /// without sending. If the final send fails the arenas stay queued and
    /// calling `close()` again retries it.
    pub async fn close(&self) -> Result<()> {
        if self.inner.drained.load(Ordering::Acquire) {
            return Ok(());
        }

        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            self.cancel.cancel();
        }
        let timer = self.timer.lock().take();
        if let Some(timer) = timer
            && let Err(e) = timer.await
        {
            warn!(error = %e, "shipper timer task failed");
        }

        let flushed = self.inner.manager.flush()?;
        let sent = self.inner.send_now(true).await?;
        if !self.inner.drained.swap(true, Ordering::AcqRel) {
            info!(flushed, sent, "shipper closed");
        }
        Ok(())
    }

    /// Composite availability for producers to poll
    pub fn availability(&self) -> Availability {
        Availability::from_causes(FailureCauses {
            io: !self
                .inner
                .transport
                .health(BINARY_LOG_TYPE_TAG)
                .is_operational(),
            buffers: self.inner.manager.ready_depth() >= self.inner.max_ready_entries,
            shutdown: self.is_closed(),
        })
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    #[inline]
    pub fn manager(&self) -> &Arc<ArenaManager> {
        &self.inner.manager
    }

    pub fn metrics(&self) -> ShipperMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

impl Drop for Shipper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for Shipper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shipper")
            .field("transport", &self.inner.transport.name())
            .field("protocol_version", &self.inner.protocol_version)
            .field("max_ready_entries", &self.inner.max_ready_entries)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Inner {
    async fn send_now(&self, forced: bool) -> Result<usize> {
        let _round = self.rounds.lock().await;

        if !forced && self.closed.load(Ordering::Acquire) {
            self.metrics.record_skipped();
            return Ok(0);
        }

        if !forced
            && !self
                .transport
                .health(BINARY_LOG_TYPE_TAG)
                .is_operational()
        {
            let flushed = self.manager.flush()?;
            self.metrics.record_skipped();
            debug!(
                flushed,
                ready = self.manager.ready_depth(),
                "transport unhealthy, keeping arenas buffered"
            );
            return Ok(0);
        }

        let mut pending = self.manager.take_ready()?.into_iter();
        let mut sent = 0;

        while let Some(entry) = pending.next() {
            let result = self
                .transport
                .send(BINARY_LOG_TYPE_TAG, self.protocol_version, entry.frame())
                .await;

            match result {
                Ok(()) => {
                    self.metrics.record_sent(entry.frame().len());
                    self.manager.release(entry);
                    sent += 1;
                }
                Err(source) if source.is_permanent() => {
                    self.metrics.record_rejected();
                    error!(
                        digestion_id = entry.digestion_id(),
                        identity = %entry.identity(),
                        data_length = entry.data_length(),
                        error = %source,
                        "frame rejected by peer, dropping it"
                    );
                    self.manager.release(entry);
                }
                Err(source) => {
                    self.metrics.record_failure();
                    let digestion_id = entry.digestion_id();
                    let mut unsent = vec![entry];
                    unsent.extend(pending);
                    let requeued = unsent.len();
                    self.manager.requeue(unsent);

                    warn!(
                        digestion_id,
                        requeued,
                        sent,
                        error = %source,
                        "send failed, arenas requeued"
                    );
                    return Err(ShipperError::Send { requeued, source });
                }
            }
        }

        if sent > 0 {
            debug!(sent, forced, "shipping round complete");
        }
        Ok(sent)
    }
}

/// Timer loop; each tick's round finishes before cancellation is observed
async fn run_timer(inner: Arc<Inner>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("shipper timer stopped");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = inner.send_now(false).await {
                    warn!(error = %e, "scheduled send failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "shipper_test.rs"]
mod shipper_test;
