//! Pipeline counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of the pipeline counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineMetrics {
    pub blocks_submitted: u64,
    pub duplicates_rejected: u64,
    /// Valid, orphan and already-processed verdicts
    pub blocks_accepted: u64,
    pub blocks_invalid: u64,
    pub validation_faults: u64,
    pub connections_banned: u64,
    pub batches_processed: u64,
    pub orphans_resolved: u64,
    /// Blocks queued or being validated at snapshot time
    pub pending: usize,
}

/// Counters shared by the facade and both workers.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    blocks_submitted: AtomicU64,
    duplicates_rejected: AtomicU64,
    blocks_accepted: AtomicU64,
    blocks_invalid: AtomicU64,
    validation_faults: AtomicU64,
    connections_banned: AtomicU64,
    batches_processed: AtomicU64,
    orphans_resolved: AtomicU64,
}

impl PipelineCounters {
    pub fn record_submission(&self, accepted: bool) {
        self.blocks_submitted.fetch_add(1, Ordering::Relaxed);
        if !accepted {
            self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_accepted(&self) {
        self.blocks_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid(&self) {
        self.blocks_invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fault(&self) {
        self.validation_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ban(&self) {
        self.connections_banned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_orphan_resolved(&self) {
        self.orphans_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, pending: usize) -> PipelineMetrics {
        PipelineMetrics {
            blocks_submitted: self.blocks_submitted.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            blocks_accepted: self.blocks_accepted.load(Ordering::Relaxed),
            blocks_invalid: self.blocks_invalid.load(Ordering::Relaxed),
            validation_faults: self.validation_faults.load(Ordering::Relaxed),
            connections_banned: self.connections_banned.load(Ordering::Relaxed),
            batches_processed: self.batches_processed.load(Ordering::Relaxed),
            orphans_resolved: self.orphans_resolved.load(Ordering::Relaxed),
            pending,
        }
    }
}
