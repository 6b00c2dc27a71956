//! Ingestion worker: drains the pending queue in batches.
//!
//! ## Loop
//!
//! 1. Peek up to `batch_size` entries from the queue head
//! 2. Empty: sleep `idle_poll_interval` (woken early by shutdown)
//! 3. One entry: validate inline on the worker thread
//! 4. Several: one task per entry on the validation pool, then wait for all
//! 5. Remove the whole batch, whatever the verdicts were
//!
//! Entries stay in the queue while they are validated, so `is_pending`
//! keeps answering `true` for blocks in flight.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace, warn};

use super::PipelineCore;
use crate::domain::{BanReason, BlockEntry, BlockStatus};
use crate::events::ValidationFault;
use crate::ports::outbound::{PeerPenaltySink, ValidationOracle};

impl<O, P> PipelineCore<O, P>
where
    O: ValidationOracle,
    P: PeerPenaltySink,
{
    pub(crate) fn run_ingestion(&self) {
        trace!("[mw-05] Ingestion worker started");

        while !self.shutdown.is_triggered() {
            if self.process_next_batch() == 0 {
                self.shutdown.sleep(self.config.idle_poll_interval);
            }
        }

        trace!("[mw-05] Ingestion worker stopped");
    }

    /// Validate and remove one batch from the queue head.
    ///
    /// Returns the batch size; `0` means the queue was empty.
    pub(crate) fn process_next_batch(&self) -> usize {
        let batch = self.queue.peek_front(self.config.batch_size);

        match batch.as_slice() {
            [] => return 0,
            [entry] => self.validate_entry(entry),
            entries => self.validation_pool.scope(|scope| {
                for entry in entries {
                    scope.spawn(move |_| self.validate_entry(entry));
                }
            }),
        }

        let removed = self.queue.remove_front(batch.len());
        debug_assert_eq!(removed, batch.len());
        self.counters.record_batch();

        debug!("[mw-05] Processed batch of {} blocks", batch.len());
        batch.len()
    }

    /// Submit one block to the oracle and punish its sender if it is bad.
    ///
    /// Faults, including panics inside the oracle, count as invalid.
    fn validate_entry(&self, entry: &BlockEntry) {
        let oracle = &self.oracle;
        let block = entry.block();
        let verdict = panic::catch_unwind(AssertUnwindSafe(|| oracle.add_block(block)))
            .unwrap_or_else(|payload| Err(ValidationFault::Panicked(panic_message(payload))));

        match verdict {
            Ok(BlockStatus::Invalid) => {
                self.counters.record_invalid();
                warn!(
                    "[mw-05] Block {} from {} is invalid",
                    entry.block(),
                    entry.connection_id()
                );
                self.punish(entry);
            }
            Ok(status) => {
                self.counters.record_accepted();
                debug!("[mw-05] Block {} -> {:?}", entry.block(), status);
            }
            Err(fault) => {
                self.counters.record_fault();
                error!(
                    "[mw-05] Fault ({}) caught while attempting to add block {}",
                    fault,
                    entry.block()
                );
                self.punish(entry);
            }
        }
    }

    fn punish(&self, entry: &BlockEntry) {
        warn!(
            "[mw-05] Banning {}: {}",
            entry.connection_id(),
            BanReason::BadBlock
        );
        self.penalty_sink
            .ban_connection(entry.connection_id(), BanReason::BadBlock);
        self.counters.record_ban();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
