//! Orphan resolver worker.
//!
//! Orphans become resolvable when their parent arrives by any route, not
//! only through this pipeline, so the oracle is polled continuously. While
//! it keeps making progress the loop does not sleep.

use tracing::{debug, trace};

use super::PipelineCore;
use crate::ports::outbound::{PeerPenaltySink, ValidationOracle};

impl<O, P> PipelineCore<O, P>
where
    O: ValidationOracle,
    P: PeerPenaltySink,
{
    pub(crate) fn run_orphan_resolver(&self) {
        trace!("[mw-05] Orphan resolver started");

        while !self.shutdown.is_triggered() {
            if !self.resolve_next_orphan() {
                self.shutdown.sleep(self.config.orphan_poll_interval);
            }
        }

        trace!("[mw-05] Orphan resolver stopped");
    }

    /// Ask the oracle to retire one orphan. Returns whether it did.
    pub(crate) fn resolve_next_orphan(&self) -> bool {
        let progressed = self.oracle.process_next_orphan();
        if progressed {
            self.counters.record_orphan_resolved();
            debug!("[mw-05] Resolved an orphan block");
        }
        progressed
    }
}
