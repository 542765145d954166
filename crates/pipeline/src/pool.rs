//! Arena pool
//!
//! Recycles closed arenas so steady-state shipping does not allocate. Free
//! lists are keyed by allocated capacity: an arena is only ever reused for a
//! stream routed to exactly the same size.
//!
//! The pool is unbounded; its size is limited by the number of arenas that
//! are in flight at once.

use std::collections::HashMap;

use logship_protocol::{ByteArena, StreamIdentity};
use parking_lot::Mutex;

use crate::Result;
use crate::metrics::{PoolMetrics, PoolMetricsSnapshot};

/// Capacity-keyed free lists of arenas
#[derive(Debug, Default)]
pub struct ArenaPool {
    free: Mutex<HashMap<usize, Vec<ByteArena>>>,
    metrics: PoolMetrics,
}

impl ArenaPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an arena of `capacity` bytes with `identity`'s header written
    ///
    /// Reuses a free arena of the same capacity if there is one, otherwise
    /// allocates.
    ///
    /// # Errors
    ///
    /// `HeaderTooLarge` or `CapacityTooLarge` from the arena.
    pub fn acquire(&self, identity: StreamIdentity, capacity: usize) -> Result<ByteArena> {
        // Pop under the lock, reset outside it
        let recycled = self.free.lock().get_mut(&capacity).and_then(Vec::pop);

        match recycled {
            Some(mut arena) => {
                self.metrics.record_hit();
                arena.reset(identity)?;
                Ok(arena)
            }
            None => {
                self.metrics.record_miss();
                Ok(ByteArena::new(identity, capacity)?)
            }
        }
    }

    /// Return an arena for reuse
    pub fn release(&self, arena: ByteArena) {
        self.metrics.record_return();
        self.free
            .lock()
            .entry(arena.capacity())
            .or_default()
            .push(arena);
    }

    /// Free arenas of one capacity
    pub fn idle(&self, capacity: usize) -> usize {
        self.free.lock().get(&capacity).map_or(0, Vec::len)
    }

    /// Free arenas across all capacities
    pub fn idle_total(&self) -> usize {
        self.free.lock().values().map(Vec::len).sum()
    }

    pub fn metrics(&self) -> PoolMetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
