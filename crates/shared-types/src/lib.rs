//! # Shared Types Crate
//!
//! Chain entities used across the node's crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: block identity is the header hash computed by
//!   [`BlockHeader::hash`]; every deduplication and lookup keys on it.
//! - **Immutable Blocks**: a [`FullBlock`] caches its hash at construction and
//!   exposes no mutable access afterwards.

pub mod entities;

pub use entities::*;
