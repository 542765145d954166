//! Ready queue
//!
//! FIFO of closed arenas waiting for transmission. Enqueueing draws the next
//! digestion id and closes the arena with it while the queue lock is held,
//! so queue order and id order always agree.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use logship_protocol::{ByteArena, StreamIdentity};
use parking_lot::Mutex;

use crate::Result;

/// Process-wide digestion id counter; ids start at 1
static NEXT_DIGESTION_ID: AtomicU64 = AtomicU64::new(1);

/// A closed arena together with the id it was closed with
#[derive(Debug)]
pub struct ReadyArena {
    digestion_id: u64,
    arena: ByteArena,
}

impl ReadyArena {
    #[inline]
    pub fn digestion_id(&self) -> u64 {
        self.digestion_id
    }

    /// Complete wire frame (header + rows)
    #[inline]
    pub fn frame(&self) -> &[u8] {
        self.arena.frame()
    }

    #[inline]
    pub fn identity(&self) -> &StreamIdentity {
        self.arena.identity()
    }

    #[inline]
    pub fn data_length(&self) -> usize {
        self.arena.data_length()
    }

    #[inline]
    pub fn arena(&self) -> &ByteArena {
        &self.arena
    }

    /// Give up the entry, keeping the arena for reuse
    #[inline]
    pub fn into_arena(self) -> ByteArena {
        self.arena
    }
}

/// FIFO of closed arenas
#[derive(Debug, Default)]
pub struct ReadyQueue {
    entries: Mutex<VecDeque<ReadyArena>>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close `arena` with a fresh digestion id and append it
    ///
    /// Returns the id.
    ///
    /// # Errors
    ///
    /// `ArenaClosed` if the arena was already closed. The arena is dropped.
    pub fn enqueue(&self, mut arena: ByteArena) -> Result<u64> {
        let mut entries = self.entries.lock();
        let digestion_id = NEXT_DIGESTION_ID.fetch_add(1, Ordering::Relaxed);
        arena.close(digestion_id)?;
        entries.push_back(ReadyArena {
            digestion_id,
            arena,
        });
        Ok(digestion_id)
    }

    /// Remove and return every entry in FIFO order
    pub fn drain(&self) -> Vec<ReadyArena> {
        let drained = std::mem::take(&mut *self.entries.lock());
        drained.into()
    }

    /// Put entries back at the head of the queue, keeping their order
    ///
    /// Used for arenas the transport refused; their ids are kept.
    pub fn requeue_front(&self, entries: Vec<ReadyArena>) {
        let mut queue = self.entries.lock();
        for entry in entries.into_iter().rev() {
            queue.push_front(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "ready_test.rs"]
mod ready_test;
