//! # Block Pipeline Subsystem (mw-05)
//!
//! Accepts candidate blocks from many concurrent peer connections,
//! deduplicates them, validates them in bounded parallel batches and bans
//! the peers that send bad ones. Orphans are retried continuously.
//!
//! ## Architecture Role
//!
//! ```text
//! [Peer handlers] ──submit_block──→ [PendingBlockQueue]
//!                                          │ peek batch (≤ batch_size)
//!                                          ↓
//!                              [block-preprocess worker]
//!                              ┌───────────┼───────────┐
//!                              ↓           ↓           ↓   validation pool
//!                        add_block    add_block    add_block ──→ [ValidationOracle]
//!                              └───────────┼───────────┘
//!                                          ↓ Invalid / fault
//!                                   [PeerPenaltySink] ban_connection(BadBlock)
//!
//! [block-postprocess worker] ──process_next_orphan──→ [ValidationOracle]
//! ```
//!
//! ## Guarantees
//!
//! - No two queued entries share a block hash.
//! - A batch is removed only after every block in it has been validated.
//! - A bad block, or a panic while validating one, bans its sender and
//!   never stops a worker.
//! - `shutdown` returns only after both workers have exited.

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::*;
pub use events::{PipelineError, ValidationFault};
pub use ports::inbound::BlockPipelineApi;
pub use ports::outbound::{PeerPenaltySink, ValidationOracle};
pub use service::BlockPipeline;
