//! Per-movement arrival queue with a counting wait signal.
//!
//! [`MovementQueue`] holds the arrivals that have reached one lane but have
//! not yet crossed, in arrival order. Alongside it runs a counting signal:
//! one token per pending arrival, carried by an unbounded crossbeam channel
//! so the owning controller can block on it together with the shutdown
//! listener.
//!
//! Single producer (the arrival feed) appends; single consumer (the lane's
//! controller) peeks the front, and removes it only once that car has
//! finished crossing. The front therefore stays visible to the completion
//! monitor for the whole claim/cross cycle.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{select, Receiver, Sender};
use junction_core::{Arrival, Movement};

use crate::shutdown::Shutdown;

/// Why a controller's wait on its queue returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// A pending-arrival token was consumed.
    Arrival,
    /// Shutdown was requested.
    Shutdown,
}

/// FIFO of uncrossed arrivals for one movement, plus its wait signal.
pub struct MovementQueue {
    movement: Movement,
    arrivals: Mutex<VecDeque<Arrival>>,
    signal_tx: Sender<()>,
    signal_rx: Receiver<()>,
}

impl MovementQueue {
    /// Create an empty queue for `movement`.
    pub fn new(movement: Movement) -> Self {
        let (signal_tx, signal_rx) = crossbeam_channel::unbounded();
        Self {
            movement,
            arrivals: Mutex::new(VecDeque::new()),
            signal_tx,
            signal_rx,
        }
    }

    /// The movement this queue serves.
    pub fn movement(&self) -> Movement {
        self.movement
    }

    /// Append an arrival and post one token to the signal.
    pub fn push(&self, arrival: Arrival) {
        self.lock().push_back(arrival);
        self.signal();
    }

    /// Post one token without appending. Used by a controller whose claim
    /// was rejected, so that the same front arrival is tried again.
    pub fn resignal(&self) {
        self.signal();
    }

    /// Block until a token is available or shutdown is requested.
    pub fn wait(&self, shutdown: &Shutdown) -> Wake {
        select! {
            recv(self.signal_rx) -> token => match token {
                Ok(()) => Wake::Arrival,
                Err(_) => Wake::Shutdown,
            },
            recv(shutdown.listener()) -> _ => Wake::Shutdown,
        }
    }

    /// The oldest uncrossed arrival, without removing it.
    pub fn front(&self) -> Option<Arrival> {
        self.lock().front().copied()
    }

    /// Remove and return the oldest arrival once it has crossed.
    pub fn pop_front(&self) -> Option<Arrival> {
        self.lock().pop_front()
    }

    /// Tokens posted but not yet consumed.
    pub fn pending(&self) -> usize {
        self.signal_rx.len()
    }

    /// Arrivals that have not finished crossing.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether every arrival so far has crossed.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn signal(&self) {
        // The receiver lives in `self`, so the channel cannot be disconnected.
        let _ = self.signal_tx.send(());
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Arrival>> {
        self.arrivals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
