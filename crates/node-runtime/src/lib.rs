//! # Node Runtime Library
//!
//! Exposes the node's modules for integration tests. The entry point is
//! the `node-runtime` binary in `main.rs`.
//!
//! - `container/` - configuration and CLI arguments
//! - `adapters/` - chain and connection adapters for the pipeline ports
//! - `runtime` - wiring and lifecycle
//! - `logging` - tracing subscriber setup

pub mod adapters;
pub mod container;
pub mod logging;
pub mod runtime;

pub use runtime::{NodePipeline, NodeRuntime};
