//! # Node Runtime
//!
//! Wires the block pipeline to the in-memory chain and the connection
//! manager. Peer handlers call [`NodeRuntime::pipeline`] to submit blocks.

use std::sync::Arc;
use std::time::Instant;
use tokio::time::Interval;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{ConnectionManager, InMemoryChain};
use crate::container::NodeConfig;
use mw_05_block_pipeline::{BlockPipeline, BlockPipelineApi};

/// Pipeline bound to this node's adapters.
pub type NodePipeline = BlockPipeline<InMemoryChain, ConnectionManager>;

pub struct NodeRuntime {
    config: NodeConfig,
    chain: Arc<InMemoryChain>,
    connections: Arc<ConnectionManager>,
    pipeline: Arc<NodePipeline>,
    started_at: Instant,
}

impl NodeRuntime {
    /// Build the chain from the environment's genesis and start the pipeline.
    pub fn new(config: NodeConfig) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;

        let network = config.environment.name();
        info!("Starting MimbleWimble node on {}", network);

        let chain = Arc::new(InMemoryChain::new(config.environment.genesis()));
        let connections = Arc::new(ConnectionManager::new());
        let pipeline = BlockPipeline::create(
            config.pipeline.clone(),
            Arc::clone(&connections),
            Arc::clone(&chain),
        )
        .context("Failed to start block pipeline")?;

        info!(
            "Block pipeline running: batch_size={}, validation_threads={}",
            config.pipeline.batch_size, config.pipeline.validation_threads
        );

        Ok(Self {
            config,
            chain,
            connections,
            pipeline,
            started_at: Instant::now(),
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn chain(&self) -> &Arc<InMemoryChain> {
        &self.chain
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    pub fn pipeline(&self) -> &Arc<NodePipeline> {
        &self.pipeline
    }

    /// Interval driving the periodic status line.
    ///
    /// The period was checked by [`NodeConfig::validate`] in [`NodeRuntime::new`],
    /// so it is never zero. Must be called inside a tokio runtime.
    pub fn status_ticker(&self) -> Interval {
        tokio::time::interval(self.config.status_interval)
    }

    /// One-line summary for the periodic status output.
    pub fn status_line(&self) -> String {
        let metrics = self.pipeline.metrics();
        format!(
            "uptime={}s height={} orphans={} pending={} accepted={} invalid={} banned={}",
            self.started_at.elapsed().as_secs(),
            self.chain.height(),
            self.chain.orphan_count(),
            metrics.pending,
            metrics.blocks_accepted,
            metrics.blocks_invalid,
            self.connections.banned_count(),
        )
    }

    /// Stop the pipeline workers. Blocks until both have exited.
    pub fn shutdown(&self) {
        info!("Shutting down node");
        self.pipeline.shutdown();
        info!("Node stopped at height {}", self.chain.height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Args, ConfigError};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = NodeConfig::default();
        config.status_interval = Duration::ZERO;
        assert!(NodeRuntime::new(config).is_err());
    }

    #[test]
    fn test_starts_at_genesis() {
        let runtime = NodeRuntime::new(NodeConfig::default()).unwrap();

        assert_eq!(runtime.chain().height(), 0);
        assert!(runtime.status_line().contains("height=0"));
        runtime.shutdown();
        assert_eq!(runtime.pipeline().pending_count(), 0);
    }

    #[test]
    fn test_zero_status_interval_is_an_error_not_a_panic() {
        let argv = ["node-runtime", "--status-interval-secs", "0"];
        let args = Args::try_parse_from(argv).unwrap();

        let err = match NodeRuntime::new(args.to_config()) {
            Ok(_) => panic!("zero status interval accepted"),
            Err(err) => err,
        };
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ZeroStatusInterval)
        ));
    }

    #[tokio::test]
    async fn test_status_ticker_uses_configured_interval() {
        let mut config = NodeConfig::default();
        config.status_interval = Duration::from_millis(250);
        let runtime = NodeRuntime::new(config).unwrap();

        let mut ticker = runtime.status_ticker();
        assert_eq!(ticker.period(), Duration::from_millis(250));
        ticker.tick().await;

        tokio::task::spawn_blocking(move || runtime.shutdown())
            .await
            .unwrap();
    }
}
