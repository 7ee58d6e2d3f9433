//! Broadcast cancellation for the intersection's worker threads.
//!
//! A [`Shutdown`] pairs an atomic flag (checked at loop heads) with a
//! zero-capacity channel that is never sent on. Requesting shutdown drops
//! the only sender, so every blocked `recv` on the listener wakes with
//! `Disconnected` at once. Workers use the listener inside `select!` or
//! `recv_deadline` to make their waits cancellable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

/// One-shot, broadcast shutdown token shared by every worker thread.
pub struct Shutdown {
    requested: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    listener: Receiver<()>,
}

// Compile-time assertion: Shutdown must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Shutdown>();
};

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// Create a token in the running state.
    pub fn new() -> Self {
        let (trigger, listener) = crossbeam_channel::bounded(0);
        Self {
            requested: AtomicBool::new(false),
            trigger: Mutex::new(Some(trigger)),
            listener,
        }
    }

    /// Request shutdown and wake every waiter. Returns `true` if this call
    /// made the request, `false` if shutdown was already requested.
    pub fn request(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::AcqRel);
        self.trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        first
    }

    /// Whether shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Receiver that becomes disconnected once shutdown is requested.
    /// Intended for `crossbeam_channel::select!`.
    pub fn listener(&self) -> &Receiver<()> {
        &self.listener
    }

    /// Sleep until `deadline` unless shutdown is requested first.
    /// Returns `true` if shutdown was requested.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        match self.listener.recv_deadline(deadline) {
            Err(RecvTimeoutError::Timeout) => self.is_requested(),
            Err(RecvTimeoutError::Disconnected) | Ok(()) => true,
        }
    }

    /// Sleep for `timeout` unless shutdown is requested first.
    /// Returns `true` if shutdown was requested.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.wait_until(Instant::now() + timeout)
    }
}
