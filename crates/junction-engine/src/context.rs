//! Shared state handed to every worker thread.
//!
//! Built once per run and shared through an `Arc`. The zone registry and
//! arbiter are used by all controllers; each queue has exactly one producer
//! (the feed) and one consumer (its movement's controller).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use junction_core::{EventSink, LightEvent, Movement, Topology, MOVEMENT_COUNT};

use crate::arbiter::ClaimArbiter;
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::metrics::MetricCounters;
use crate::queue::MovementQueue;
use crate::shutdown::Shutdown;
use crate::zones::ZoneRegistry;

/// Timing knobs copied out of [`SimConfig`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Timing {
    pub crossing_secs: u64,
    pub retry_backoff: Duration,
    pub drain_poll: Duration,
}

pub(crate) struct SharedContext {
    pub topology: Topology,
    pub zones: ZoneRegistry,
    pub arbiter: ClaimArbiter,
    pub queues: [MovementQueue; MOVEMENT_COUNT],
    pub shutdown: Shutdown,
    pub feed_done: AtomicBool,
    pub metrics: MetricCounters,
    pub clock: SimClock,
    pub timing: Timing,
    sink: Arc<dyn EventSink>,
}

impl SharedContext {
    /// Build the context and set the clock's start mark.
    ///
    /// `config` must already be validated.
    pub fn new(config: &SimConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            topology: config.topology.clone(),
            zones: ZoneRegistry::new(),
            arbiter: ClaimArbiter::new(),
            queues: Movement::ALL.map(MovementQueue::new),
            shutdown: Shutdown::new(),
            feed_done: AtomicBool::new(false),
            metrics: MetricCounters::default(),
            clock: SimClock::start(config.second),
            timing: Timing {
                crossing_secs: config.crossing_secs,
                retry_backoff: config.retry_backoff,
                drain_poll: config.drain_poll,
            },
            sink,
        }
    }

    /// Queue for a modeled movement.
    pub fn queue(&self, movement: Movement) -> Option<&MovementQueue> {
        movement.index().map(|i| &self.queues[i])
    }

    pub fn emit(&self, event: LightEvent) {
        self.sink.record(&event);
    }

    pub fn mark_feed_done(&self) {
        self.feed_done.store(true, Ordering::Release);
    }

    pub fn is_feed_done(&self) -> bool {
        self.feed_done.load(Ordering::Acquire)
    }
}
