//! # Port Adapters
//!
//! In-process implementations of the block pipeline's outbound ports.
//!
//! - `InMemoryChain` implements `ValidationOracle`
//! - `ConnectionManager` implements `PeerPenaltySink`

pub mod chain;
pub mod peers;

pub use chain::InMemoryChain;
pub use peers::ConnectionManager;
