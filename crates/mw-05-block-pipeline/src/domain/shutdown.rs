//! Cooperative shutdown flag.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One-way stop flag polled by the workers.
///
/// Once triggered it never resets. Sleepers are woken immediately.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    requested: AtomicBool,
    lock: Mutex<()>,
    wakeup: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Returns `true` only for the call that flipped the flag.
    pub fn trigger(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        // Notify under the lock so a sleeper between its flag check and its
        // wait cannot miss the wake-up.
        let _guard = self.lock.lock();
        self.wakeup.notify_all();
        first
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleep for up to `duration`, returning early on shutdown.
    ///
    /// Returns whether shutdown has been requested.
    pub fn sleep(&self, duration: Duration) -> bool {
        let mut guard = self.lock.lock();
        if self.is_triggered() {
            return true;
        }
        self.wakeup.wait_for(&mut guard, duration);
        self.is_triggered()
    }
}
