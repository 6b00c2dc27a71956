//! Node configuration.

pub mod config;

pub use config::{Args, ConfigError, Environment, NodeConfig};
