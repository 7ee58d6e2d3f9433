//! Replays the arrival schedule into the movement queues.

use std::sync::Arc;

use junction_core::Schedule;
use tracing::{debug, warn};

use crate::context::SharedContext;

pub(crate) struct ArrivalFeed {
    schedule: Schedule,
    ctx: Arc<SharedContext>,
}

impl ArrivalFeed {
    pub fn new(schedule: Schedule, ctx: Arc<SharedContext>) -> Self {
        Self { schedule, ctx }
    }

    /// Deliver every arrival at its release time, then mark the feed done.
    ///
    /// Returns the number of arrivals delivered. Stops early, without
    /// delivering the rest, if shutdown is requested while waiting.
    pub fn run(self) -> usize {
        let ctx = &self.ctx;
        let mut delivered = 0;

        for arrival in self.schedule.arrivals() {
            let due = ctx.clock.instant_at(arrival.release_time);
            if ctx.shutdown.wait_until(due) {
                debug!(delivered, "feed cancelled");
                break;
            }
            let Some(queue) = ctx.queue(arrival.movement) else {
                warn!(car = %arrival.id, movement = %arrival.movement, "no queue for arrival");
                continue;
            };
            queue.push(*arrival);
            ctx.metrics.record_arrival();
            delivered += 1;
            debug!(
                car = %arrival.id,
                movement = %arrival.movement,
                at = ctx.clock.elapsed_seconds(),
                "car arrived"
            );
        }

        ctx.mark_feed_done();
        debug!(delivered, "feed finished");
        delivered
    }
}
