//! Inbound ports (API) for the Block Pipeline subsystem.

use crate::domain::PipelineMetrics;
use shared_types::{ConnectionId, FullBlock, Hash};

/// API used by peer-message handlers.
pub trait BlockPipelineApi: Send + Sync {
    /// Queue a block received from `connection_id` for validation.
    ///
    /// # Returns
    /// `true` if the block was newly queued, `false` if a block with the same
    /// hash is already pending.
    fn submit_block(&self, connection_id: ConnectionId, block: FullBlock) -> bool;

    /// Whether a block with this hash is queued or being validated.
    ///
    /// Lets handlers skip requesting a block that is already in flight.
    fn is_pending(&self, hash: &Hash) -> bool;

    /// Number of blocks currently queued or being validated.
    fn pending_count(&self) -> usize;

    /// Snapshot of pipeline counters.
    fn metrics(&self) -> PipelineMetrics;

    /// Stop both workers and wait for them to exit. Idempotent.
    fn shutdown(&self);
}
