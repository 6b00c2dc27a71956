//! # Domain Layer for the Block Pipeline
//!
//! ## Contents
//!
//! - **entities**: `BlockEntry`, `BlockStatus`, `BanReason`
//! - **queue**: `PendingBlockQueue`, the deduplicating insertion-ordered queue
//! - **config**: `PipelineConfig`
//! - **metrics**: lock-free counters and their `PipelineMetrics` snapshot
//! - **shutdown**: `ShutdownSignal`, the cooperative stop flag with wake-up
//!
//! Nothing in here spawns threads or talks to the ports.

mod config;
mod entities;
mod metrics;
mod queue;
mod shutdown;

pub use config::*;
pub use entities::*;
pub use metrics::*;
pub use queue::*;
pub use shutdown::*;
