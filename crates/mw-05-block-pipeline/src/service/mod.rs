//! # Block Pipeline Service
//!
//! [`BlockPipeline`] is the facade handed to peer-message handlers. It owns
//! two long-lived worker threads:
//!
//! - `block-preprocess`: drains the pending queue in batches and validates
//!   them against the [`ValidationOracle`] (see [`ingestion`])
//! - `block-postprocess`: keeps asking the oracle to resolve orphans
//!   (see [`orphans`])
//!
//! ## Shutdown
//!
//! [`BlockPipelineApi::shutdown`] raises the shared [`ShutdownSignal`] and
//! joins both workers. An in-flight batch always finishes validation and
//! removal first. Dropping the facade performs the same teardown.

mod ingestion;
mod orphans;

use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

use crate::domain::{
    BlockEntry, PendingBlockQueue, PipelineConfig, PipelineCounters, PipelineMetrics,
    ShutdownSignal,
};
use crate::events::PipelineError;
use crate::ports::inbound::BlockPipelineApi;
use crate::ports::outbound::{PeerPenaltySink, ValidationOracle};
use shared_types::{short_hash, ConnectionId, FullBlock, Hash};

const INGESTION_WORKER: &str = "block-preprocess";
const ORPHAN_WORKER: &str = "block-postprocess";

/// State shared between the facade and both workers.
pub(crate) struct PipelineCore<O, P> {
    pub(crate) config: PipelineConfig,
    pub(crate) queue: PendingBlockQueue,
    pub(crate) oracle: Arc<O>,
    pub(crate) penalty_sink: Arc<P>,
    pub(crate) shutdown: ShutdownSignal,
    pub(crate) counters: PipelineCounters,
    /// Bounded pool that runs the per-block tasks of a batch.
    pub(crate) validation_pool: rayon::ThreadPool,
}

impl<O, P> PipelineCore<O, P>
where
    O: ValidationOracle,
    P: PeerPenaltySink,
{
    pub(crate) fn new(
        config: PipelineConfig,
        oracle: Arc<O>,
        penalty_sink: Arc<P>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let validation_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.validation_threads)
            .thread_name(|index| format!("block-validate-{}", index))
            .build()
            .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;

        Ok(Self {
            config,
            queue: PendingBlockQueue::new(),
            oracle,
            penalty_sink,
            shutdown: ShutdownSignal::new(),
            counters: PipelineCounters::default(),
            validation_pool,
        })
    }

    pub(crate) fn submit_block(&self, connection_id: ConnectionId, block: FullBlock) -> bool {
        let entry = BlockEntry::new(connection_id, block);
        let hash = short_hash(entry.hash());

        // The queue closes under its own lock, so this cannot race shutdown.
        if self.queue.try_insert_unique(entry) {
            self.counters.record_submission(true);
            debug!("[mw-05] Queued block {} from {}", hash, connection_id);
            return true;
        }

        if self.queue.is_closed() {
            debug!(
                "[mw-05] Dropping block {} from {}: shutting down",
                hash, connection_id
            );
        } else {
            self.counters.record_submission(false);
            debug!(
                "[mw-05] Block {} from {} already pending",
                hash, connection_id
            );
        }
        false
    }

    /// Close the queue, then raise the stop signal.
    ///
    /// Returns `true` only for the first request.
    pub(crate) fn request_shutdown(&self) -> bool {
        self.queue.close();
        self.shutdown.trigger()
    }
}

/// Block ingestion pipeline.
///
/// ## Thread Safety
///
/// Shared across peer handlers via `Arc`. The queue is the only state
/// mutated by more than one thread and it synchronises itself.
///
/// ## Dependencies
///
/// - `O: ValidationOracle` - chain state and orphan pool
/// - `P: PeerPenaltySink` - connection banning
pub struct BlockPipeline<O, P>
where
    O: ValidationOracle + 'static,
    P: PeerPenaltySink + 'static,
{
    core: Arc<PipelineCore<O, P>>,
    /// Worker handles; emptied by the first shutdown.
    workers: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
}

impl<O, P> BlockPipeline<O, P>
where
    O: ValidationOracle + 'static,
    P: PeerPenaltySink + 'static,
{
    /// Build the pipeline and start both workers.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if `config` fails validation
    /// - `ThreadPool` if the validation pool cannot be built
    /// - `WorkerSpawn` if a worker thread cannot be started; a worker that
    ///   did start is stopped and joined first
    pub fn create(
        config: PipelineConfig,
        penalty_sink: Arc<P>,
        oracle: Arc<O>,
    ) -> Result<Arc<Self>, PipelineError> {
        let core = Arc::new(PipelineCore::new(config, oracle, penalty_sink)?);

        let ingestion = spawn_worker(
            INGESTION_WORKER,
            Arc::clone(&core),
            PipelineCore::run_ingestion,
        )?;
        let orphans = match spawn_worker(
            ORPHAN_WORKER,
            Arc::clone(&core),
            PipelineCore::run_orphan_resolver,
        ) {
            Ok(handle) => handle,
            Err(err) => {
                core.request_shutdown();
                if ingestion.join().is_err() {
                    error!("[mw-05] {} worker panicked", INGESTION_WORKER);
                }
                return Err(err);
            }
        };

        info!(
            "[mw-05] Block pipeline started (batch size {}, {} validation threads)",
            core.config.batch_size, core.config.validation_threads
        );

        let workers = vec![(INGESTION_WORKER, ingestion), (ORPHAN_WORKER, orphans)];
        Ok(Arc::new(Self {
            core,
            workers: Mutex::new(workers),
        }))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.core.config
    }

    /// Whether shutdown has been requested.
    pub fn is_shutting_down(&self) -> bool {
        self.core.shutdown.is_triggered()
    }
}

impl<O, P> BlockPipelineApi for BlockPipeline<O, P>
where
    O: ValidationOracle + 'static,
    P: PeerPenaltySink + 'static,
{
    fn submit_block(&self, connection_id: ConnectionId, block: FullBlock) -> bool {
        self.core.submit_block(connection_id, block)
    }

    fn is_pending(&self, hash: &Hash) -> bool {
        self.core.queue.contains_hash(hash)
    }

    fn pending_count(&self) -> usize {
        self.core.queue.len()
    }

    fn metrics(&self) -> PipelineMetrics {
        self.core.counters.snapshot(self.core.queue.len())
    }

    fn shutdown(&self) {
        // Held across the joins: a concurrent caller waits until both
        // workers are gone.
        let mut workers = self.workers.lock();

        if self.core.request_shutdown() {
            info!("[mw-05] Shutting down block pipeline");
        }

        for (name, handle) in workers.drain(..) {
            if handle.join().is_err() {
                error!("[mw-05] {} worker panicked", name);
            }
        }
    }
}

impl<O, P> Drop for BlockPipeline<O, P>
where
    O: ValidationOracle + 'static,
    P: PeerPenaltySink + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker<O, P>(
    name: &'static str,
    core: Arc<PipelineCore<O, P>>,
    body: fn(&PipelineCore<O, P>),
) -> Result<JoinHandle<()>, PipelineError>
where
    O: ValidationOracle + 'static,
    P: PeerPenaltySink + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || body(&core))
        .map_err(|source| PipelineError::WorkerSpawn {
            worker: name,
            source,
        })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::{Duration, Instant};

    fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        condition()
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let config = PipelineConfig {
            validation_threads: 0,
            ..Default::default()
        };
        let result = BlockPipeline::create(
            config,
            Arc::new(RecordingSink::default()),
            Arc::new(ScriptedOracle::default()),
        );
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_submitted_block_is_validated_and_removed() {
        let oracle = Arc::new(ScriptedOracle::default());
        let pipeline = BlockPipeline::create(
            PipelineConfig::default(),
            Arc::new(RecordingSink::default()),
            Arc::clone(&oracle),
        )
        .unwrap();

        let block = block(1);
        let hash = *block.hash();
        assert!(pipeline.submit_block(ConnectionId(1), block));

        assert!(wait_until(Duration::from_secs(5), || !pipeline.is_pending(&hash)));
        assert_eq!(oracle.seen.lock().as_slice(), &[hash]);

        let metrics = pipeline.metrics();
        assert_eq!(metrics.blocks_submitted, 1);
        assert_eq!(metrics.blocks_accepted, 1);
        assert_eq!(metrics.pending, 0);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let pipeline = BlockPipeline::create(
            PipelineConfig::default(),
            Arc::new(RecordingSink::default()),
            Arc::new(ScriptedOracle::default()),
        )
        .unwrap();

        pipeline.shutdown();
        assert!(pipeline.is_shutting_down());
        pipeline.shutdown();
        assert!(pipeline.workers.lock().is_empty());
    }

    #[test]
    fn test_concurrent_shutdown_callers_both_wait_for_workers() {
        let oracle = ScriptedOracle {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        };
        let oracle = Arc::new(oracle);
        let pipeline = BlockPipeline::create(
            PipelineConfig::default(),
            Arc::new(RecordingSink::default()),
            Arc::clone(&oracle),
        )
        .unwrap();

        pipeline.submit_block(ConnectionId(1), block(1));
        assert!(wait_until(Duration::from_secs(5), || {
            oracle.started.load(Ordering::SeqCst) == 1
        }));

        let callers: Vec<_> = (0..2)
            .map(|_| {
                let pipeline = Arc::clone(&pipeline);
                thread::spawn(move || {
                    pipeline.shutdown();
                    pipeline.pending_count()
                })
            })
            .collect();

        for caller in callers {
            assert_eq!(caller.join().unwrap(), 0);
        }
        assert_eq!(pipeline.metrics().blocks_accepted, 1);
        assert_eq!(oracle.seen.lock().len(), 1);
    }

    #[test]
    fn test_submit_refused_once_queue_closed() {
        let oracle = ScriptedOracle::default();
        let (core, _oracle, _sink) = new_core(PipelineConfig::default(), oracle);
        assert!(core.submit_block(ConnectionId(1), block(1)));

        // Close without raising the signal: a submitter that already passed
        // any flag check must still be turned away.
        core.queue.close();
        assert!(!core.shutdown.is_triggered());
        assert!(!core.submit_block(ConnectionId(2), block(2)));

        assert_eq!(core.queue.len(), 1);
        let metrics = core.counters.snapshot(core.queue.len());
        assert_eq!(metrics.blocks_submitted, 1);
        assert_eq!(metrics.duplicates_rejected, 0);
    }

    #[test]
    fn test_submit_after_shutdown_is_refused() {
        let pipeline = BlockPipeline::create(
            PipelineConfig::default(),
            Arc::new(RecordingSink::default()),
            Arc::new(ScriptedOracle::default()),
        )
        .unwrap();
        pipeline.shutdown();

        let late = block(3);
        let hash = *late.hash();
        assert!(!pipeline.submit_block(ConnectionId(1), late));
        assert!(!pipeline.is_pending(&hash));
        assert_eq!(pipeline.pending_count(), 0);
    }
}
