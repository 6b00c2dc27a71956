//! Outbound ports (SPI) for the Block Pipeline subsystem.
//!
//! Both collaborators are called concurrently from several validation tasks
//! and must be internally thread-safe.

use crate::domain::{BanReason, BlockStatus};
use crate::events::ValidationFault;
use shared_types::{ConnectionId, FullBlock};

/// Chain-state oracle that owns consensus rules, the chain and the orphan pool.
pub trait ValidationOracle: Send + Sync {
    /// Validate a block and apply it to the chain (or the orphan pool).
    ///
    /// Called concurrently for every block of a batch.
    fn add_block(&self, block: &FullBlock) -> Result<BlockStatus, ValidationFault>;

    /// Try to retire one orphan whose parent has become known.
    ///
    /// Returns `false` when no orphan could be resolved.
    fn process_next_orphan(&self) -> bool;
}

/// Receiver of peer-misbehaviour verdicts.
pub trait PeerPenaltySink: Send + Sync {
    /// Ban a connection. Fire-and-forget.
    fn ban_connection(&self, connection_id: ConnectionId, reason: BanReason);
}
