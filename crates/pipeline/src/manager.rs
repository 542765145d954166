//! Arena manager
//!
//! Owns one "current" arena per stream identity and turns `put` calls into
//! filled, closed arenas on the ready queue.
//!
//! # Locking
//!
//! ```text
//! gate (RwLock)      put: shared, whole compound step | flush/drain: exclusive
//!  └─ slots (RwLock) identity → slot lookup, write only on first sight
//!      └─ slot       per-identity current arena
//!          └─ ready queue / pool (own mutexes)
//! ```
//!
//! Producers of different identities only contend on the shared gate. A
//! rollover can never interleave with a drain, and no transport work
//! happens under any of these locks.

use std::collections::HashMap;
use std::sync::Arc;

use logship_protocol::{ByteArena, ProtocolError, StreamIdentity};
use logship_routing::RoutingTable;
use parking_lot::{Mutex, RwLock};

use crate::metrics::{ManagerMetrics, ManagerMetricsSnapshot, PoolMetricsSnapshot};
use crate::pool::ArenaPool;
use crate::ready::{ReadyArena, ReadyQueue};
use crate::{PipelineError, Result};

/// Route resolved for an identity on first sight
#[derive(Debug, Clone, Copy)]
struct Route {
    capacity: usize,
    header_len: usize,
}

impl Route {
    /// Largest row an arena of this stream can hold
    #[inline]
    fn usable(&self) -> usize {
        self.capacity - self.header_len
    }
}

/// Per-stream state
///
/// Every arena of a slot is opened with the identity that registered it, so
/// all of them carry the same header whatever hostname later callers report.
#[derive(Debug)]
struct Slot {
    identity: StreamIdentity,
    route: Route,
    current: Mutex<Option<ByteArena>>,
}

impl Slot {
    /// Reject a hostname whose own header could never fit this route
    ///
    /// Arenas always carry the registering identity's header, but the
    /// outcome for a caller must not depend on which host registered first.
    fn admit(&self, identity: &StreamIdentity) -> Result<()> {
        if identity.client_hostname() == self.identity.client_hostname() {
            return Ok(());
        }
        let header_len = identity.header_len();
        if header_len > self.route.capacity {
            return Err(ProtocolError::header_too_large(header_len, self.route.capacity).into());
        }
        Ok(())
    }
}

/// Buffers rows into per-identity arenas
#[derive(Debug)]
pub struct ArenaManager {
    routing: RoutingTable,
    gate: RwLock<()>,
    slots: RwLock<HashMap<StreamIdentity, Arc<Slot>>>,
    ready: ReadyQueue,
    pool: ArenaPool,
    metrics: ManagerMetrics,
}

impl ArenaManager {
    pub fn new(routing: RoutingTable) -> Self {
        Self {
            routing,
            gate: RwLock::new(()),
            slots: RwLock::new(HashMap::new()),
            ready: ReadyQueue::new(),
            pool: ArenaPool::new(),
            metrics: ManagerMetrics::new(),
        }
    }

    /// Append one row to the current arena of `identity`
    ///
    /// When the row does not fit, the current arena is closed onto the ready
    /// queue and the row goes into a fresh one. Rows are never split.
    ///
    /// Identities differing only by hostname share the slot registered by the
    /// first of them: its route, header and hostname apply to all. Each
    /// hostname must still fit its own header into the route's capacity.
    ///
    /// # Errors
    ///
    /// - `Routing` if no rule matches the log type
    /// - `Protocol(HeaderTooLarge)` if the identity's header does not fit its
    ///   route's capacity
    /// - `RowTooLarge` if the row exceeds capacity minus the slot's header
    ///   length
    ///
    /// A rejected call leaves the current arena and the ready queue untouched.
    pub fn put(&self, identity: &StreamIdentity, payload: &[u8]) -> Result<()> {
        let _gate = self.gate.read();

        let slot = self.slot(identity)?;
        slot.admit(identity)?;
        let mut current = slot.current.lock();

        if payload.len() > slot.route.usable() {
            self.metrics.record_rejected();
            return Err(PipelineError::row_too_large(
                identity,
                payload.len(),
                slot.route.usable(),
            ));
        }

        let arena = match current.take() {
            Some(arena) if arena.available(payload.len()) => arena,
            Some(full) => {
                let data_length = full.data_length();
                let digestion_id = self.ready.enqueue(full)?;
                self.metrics.record_rollover();
                self.metrics.record_enqueued(1);
                tracing::debug!(
                    identity = %identity,
                    digestion_id,
                    data_length,
                    "arena rolled over"
                );
                self.pool.acquire(slot.identity.clone(), slot.route.capacity)?
            }
            None => self.pool.acquire(slot.identity.clone(), slot.route.capacity)?,
        };

        let arena = current.insert(arena);
        if !arena.put(payload)? {
            self.metrics.record_rejected();
            return Err(PipelineError::row_too_large(
                identity,
                payload.len(),
                arena.usable_capacity(),
            ));
        }

        self.metrics.record_row(payload.len());
        Ok(())
    }

    /// Look up or register the slot of an identity
    fn slot(&self, identity: &StreamIdentity) -> Result<Arc<Slot>> {
        if let Some(slot) = self.slots.read().get(identity) {
            return Ok(Arc::clone(slot));
        }

        let route = self.resolve(identity)?;
        let mut slots = self.slots.write();
        let slot = slots.entry(identity.clone()).or_insert_with(|| {
            Arc::new(Slot {
                identity: identity.clone(),
                route,
                current: Mutex::new(None),
            })
        });
        Ok(Arc::clone(slot))
    }

    fn resolve(&self, identity: &StreamIdentity) -> Result<Route> {
        let capacity = self.routing.resolve(identity.log_type())?;
        let header_len = identity.header_len();
        if header_len > capacity {
            return Err(ProtocolError::header_too_large(header_len, capacity).into());
        }
        tracing::debug!(identity = %identity, capacity, header_len, "registered stream");
        Ok(Route {
            capacity,
            header_len,
        })
    }

    /// Close every non-empty current arena onto the ready queue
    ///
    /// Returns the number of arenas enqueued.
    pub fn flush(&self) -> Result<usize> {
        let _gate = self.gate.write();
        self.flush_locked()
    }

    fn flush_locked(&self) -> Result<usize> {
        let mut flushed = 0;
        for slot in self.slots.read().values() {
            let mut current = slot.current.lock();
            if let Some(arena) = current.take_if(|arena| !arena.is_empty()) {
                self.ready.enqueue(arena)?;
                flushed += 1;
            }
        }

        if flushed > 0 {
            self.metrics.record_enqueued(flushed);
            tracing::debug!(flushed, ready = self.ready.len(), "flushed current arenas");
        }
        Ok(flushed)
    }

    /// Flush, then remove every ready arena, without returning them to the pool
    ///
    /// Callers hand each entry back through `release` (or `requeue`).
    pub fn take_ready(&self) -> Result<Vec<ReadyArena>> {
        let _gate = self.gate.write();
        self.flush_locked()?;
        Ok(self.ready.drain())
    }

    /// Flush, drain and hand every ready arena to `consumer`
    ///
    /// The consumer runs after the gate is released; producers keep writing
    /// meanwhile. Each arena goes back to the pool once consumed. Returns
    /// the number of arenas consumed.
    pub fn for_each_ready<F>(&self, mut consumer: F) -> Result<usize>
    where
        F: FnMut(&ReadyArena),
    {
        let entries = self.take_ready()?;
        let count = entries.len();
        for entry in entries {
            consumer(&entry);
            self.release(entry);
        }
        Ok(count)
    }

    /// Return a consumed arena to the pool
    #[inline]
    pub fn release(&self, entry: ReadyArena) {
        self.pool.release(entry.into_arena());
    }

    /// Put unsent arenas back at the head of the ready queue
    #[inline]
    pub fn requeue(&self, entries: Vec<ReadyArena>) {
        self.ready.requeue_front(entries);
    }

    /// Closed arenas waiting for transmission
    #[inline]
    pub fn ready_depth(&self) -> usize {
        self.ready.len()
    }

    /// Identities that currently hold an open arena
    pub fn current_count(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.current.lock().is_some())
            .count()
    }

    #[inline]
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn metrics(&self) -> ManagerMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn pool_metrics(&self) -> PoolMetricsSnapshot {
        self.pool.metrics()
    }

    /// Free arenas waiting in the pool
    pub fn pooled(&self) -> usize {
        self.pool.idle_total()
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
