//! Pending-block queue.
//!
//! Producers are any number of peer handlers; the single consumer is the
//! ingestion worker, which peeks a batch, validates it without holding the
//! lock, then removes exactly that batch.

use parking_lot::Mutex;
use shared_types::Hash;
use std::collections::{HashSet, VecDeque};

use super::BlockEntry;

#[derive(Default)]
struct QueueState {
    entries: VecDeque<BlockEntry>,
    /// Hashes of everything in `entries`, kept in lockstep.
    hashes: HashSet<Hash>,
    /// Set once at shutdown; no insert succeeds afterwards.
    closed: bool,
}

/// Insertion-ordered queue that never holds two entries with the same hash.
///
/// Every operation takes the same lock, so a dedup-insert can never race a
/// batch removal.
#[derive(Default)]
pub struct PendingBlockQueue {
    state: Mutex<QueueState>,
}

impl PendingBlockQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` unless an entry with the same block hash is queued.
    ///
    /// Returns whether the entry was inserted. Always `false` once the queue
    /// is closed.
    pub fn try_insert_unique(&self, entry: BlockEntry) -> bool {
        let mut state = self.state.lock();
        if state.closed || !state.hashes.insert(*entry.hash()) {
            return false;
        }
        state.entries.push_back(entry);
        true
    }

    /// Copy up to `max_count` entries from the head without removing them.
    pub fn peek_front(&self, max_count: usize) -> Vec<BlockEntry> {
        self.state
            .lock()
            .entries
            .iter()
            .take(max_count)
            .cloned()
            .collect()
    }

    /// Remove `count` entries from the head and return how many were removed.
    ///
    /// Only the single consumer calls this, with the size of its last peek,
    /// so the result equals `count`.
    pub fn remove_front(&self, count: usize) -> usize {
        let mut state = self.state.lock();
        debug_assert!(count <= state.entries.len());

        let mut removed = 0;
        while removed < count {
            let Some(entry) = state.entries.pop_front() else {
                break;
            };
            state.hashes.remove(entry.hash());
            removed += 1;
        }
        removed
    }

    /// Refuse all further inserts. Entries already queued stay.
    pub fn close(&self) {
        self.state.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn contains_hash(&self, hash: &Hash) -> bool {
        self.state.lock().hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}
