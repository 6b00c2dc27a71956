//! # Node Configuration
//!
//! Built from command-line arguments; every numeric option can also come
//! from an `MW_*` environment variable.

use std::time::Duration;

use clap::Parser;
use mw_05_block_pipeline::PipelineConfig;
use shared_types::{BlockHeader, FullBlock, TransactionBody, ZERO_HASH};
use thiserror::Error;

/// Which chain the node follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Mainnet,
    Floonet,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Mainnet => "mainnet",
            Environment::Floonet => "floonet",
        }
    }

    /// Genesis block of this environment.
    pub fn genesis(&self) -> FullBlock {
        let (timestamp, nonce) = match self {
            Environment::Mainnet => (1_547_596_800, 41),
            Environment::Floonet => (1_545_004_800, 23),
        };
        FullBlock::new(
            BlockHeader {
                version: 1,
                height: 0,
                previous_hash: ZERO_HASH,
                timestamp,
                total_difficulty: 1,
                nonce,
                ..Default::default()
            },
            TransactionBody::default(),
        )
    }
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub environment: Environment,
    /// Suppress the periodic status line.
    pub headless: bool,
    /// Time between status lines.
    pub status_interval: Duration,
    pub pipeline: PipelineConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            headless: false,
            status_interval: Duration::from_secs(1),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl NodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Pipeline(e.to_string()))?;
        if self.status_interval.is_zero() {
            return Err(ConfigError::ZeroStatusInterval);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid pipeline settings: {0}")]
    Pipeline(String),

    #[error("status interval must be non-zero")]
    ZeroStatusInterval,
}

/// MimbleWimble full node.
#[derive(Parser, Debug)]
#[command(name = "node-runtime")]
#[command(about = "MimbleWimble full node")]
pub struct Args {
    /// Follow the floonet test network instead of mainnet
    #[arg(long)]
    pub floonet: bool,

    /// Do not print the periodic status line
    #[arg(long)]
    pub headless: bool,

    /// Blocks validated per pipeline batch
    #[arg(long, env = "MW_BATCH_SIZE", default_value_t = 8)]
    pub batch_size: usize,

    /// Validation pool threads (defaults to the number of CPUs)
    #[arg(long, env = "MW_VALIDATION_THREADS")]
    pub validation_threads: Option<usize>,

    /// Worker back-off when idle, in milliseconds
    #[arg(long, env = "MW_POLL_INTERVAL_MS", default_value_t = 5)]
    pub poll_interval_ms: u64,

    /// Seconds between status lines
    #[arg(long, env = "MW_STATUS_INTERVAL_SECS", default_value_t = 1)]
    pub status_interval_secs: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "MW_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn to_config(&self) -> NodeConfig {
        let defaults = PipelineConfig::default();
        let poll_interval = Duration::from_millis(self.poll_interval_ms);

        NodeConfig {
            environment: if self.floonet {
                Environment::Floonet
            } else {
                Environment::Mainnet
            },
            headless: self.headless,
            status_interval: Duration::from_secs(self.status_interval_secs),
            pipeline: PipelineConfig {
                batch_size: self.batch_size,
                validation_threads: self
                    .validation_threads
                    .unwrap_or(defaults.validation_threads),
                idle_poll_interval: poll_interval,
                orphan_poll_interval: poll_interval,
            },
        }
    }
}
