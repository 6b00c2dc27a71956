//! Ports for the Block Pipeline subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::BlockPipelineApi;
pub use outbound::{PeerPenaltySink, ValidationOracle};
