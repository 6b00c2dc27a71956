//! # Core Domain Entities
//!
//! - [`BlockEntry`]: a queued block plus the connection that sent it
//! - [`BlockStatus`]: the oracle's verdict on a block
//! - [`BanReason`]: why a connection is being punished

use shared_types::{ConnectionId, FullBlock, Hash};
use std::fmt;
use std::sync::Arc;

/// A block waiting in the pending queue.
///
/// Identity is the block hash alone: the same block sent by two different
/// connections is one entry. Entries are immutable; the block is shared so
/// that snapshot copies of the queue head stay cheap.
#[derive(Clone, Debug)]
pub struct BlockEntry {
    connection_id: ConnectionId,
    block: Arc<FullBlock>,
}

impl BlockEntry {
    pub fn new(connection_id: ConnectionId, block: impl Into<Arc<FullBlock>>) -> Self {
        Self {
            connection_id,
            block: block.into(),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn block(&self) -> &FullBlock {
        &self.block
    }

    pub fn hash(&self) -> &Hash {
        self.block.hash()
    }
}

impl PartialEq for BlockEntry {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for BlockEntry {}

/// Verdict returned by the validation oracle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockStatus {
    /// Accepted into the chain.
    Valid,
    /// Violates structural or consensus rules. The sender gets banned.
    Invalid,
    /// Parent unknown; parked in the orphan pool.
    Orphan,
    /// Already in the chain or the orphan pool.
    AlreadyProcessed,
}

impl BlockStatus {
    pub fn is_invalid(&self) -> bool {
        matches!(self, BlockStatus::Invalid)
    }
}

/// Reason attached to a ban.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BanReason {
    /// Sent a block that failed validation.
    BadBlock,
}

impl fmt::Display for BanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BanReason::BadBlock => f.write_str("bad block"),
        }
    }
}
