//! Test utilities for junction development.
//!
//! Provides a recording [`EventSink`] for capturing light events,
//! schedule fixtures in [`fixtures`], and checks over recorded event
//! timelines in [`timeline`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod timeline;

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use junction_core::{EventSink, LightEvent};

/// [`EventSink`] that keeps every event in emission order.
///
/// Events are appended under a single lock, so the recorded order is a
/// total order consistent with each emitting thread's program order.
pub struct RecordingSink {
    events: Mutex<Vec<LightEvent>>,
    grew: Condvar,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            grew: Condvar::new(),
        }
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<LightEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events rendered as log lines.
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }

    /// Block until at least `n` events are recorded or `timeout` elapses.
    /// Returns whether the count was reached.
    pub fn wait_for_events(&self, n: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        while events.len() < n {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            events = self
                .grew
                .wait_timeout(events, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &LightEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
        self.grew.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::{CarId, Direction, Movement, Side};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn wait_for_events_wakes_on_record() {
        let sink = Arc::new(RecordingSink::new());
        let writer = Arc::clone(&sink);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            writer.record(&LightEvent::Green {
                movement: Movement::new(Side::North, Direction::Right),
                time: 0,
                car: CarId(1),
            });
        });
        assert!(sink.wait_for_events(1, Duration::from_secs(5)));
        handle.join().unwrap();
        assert_eq!(
            sink.lines(),
            vec!["traffic light 0 2 turns green at time 0 for car 1".to_string()]
        );
    }

    #[test]
    fn wait_for_events_times_out() {
        let sink = RecordingSink::new();
        assert!(!sink.wait_for_events(1, Duration::from_millis(5)));
    }
}
