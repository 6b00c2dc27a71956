//! Error types for the Block Pipeline subsystem.

use std::io;
use thiserror::Error;

/// Errors raised while constructing or running the pipeline itself.
///
/// Per-block validation problems are never surfaced here; they are
/// [`ValidationFault`]s and end in a ban.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build validation thread pool: {0}")]
    ThreadPool(String),

    #[error("Failed to spawn {worker} worker: {source}")]
    WorkerSpawn {
        worker: &'static str,
        #[source]
        source: io::Error,
    },
}

/// A failure raised while validating a single block.
///
/// Treated exactly like an `Invalid` verdict: the submitting connection is
/// banned and the pipeline moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationFault {
    #[error("internal validation error: {0}")]
    Internal(String),

    #[error("validation panicked: {0}")]
    Panicked(String),
}
