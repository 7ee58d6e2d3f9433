//! Drain detection and shutdown.
//!
//! The [`CompletionMonitor`] polls until the run has drained, then
//! requests shutdown, which wakes every controller blocked on its signal.
//! Drained means: the feed has delivered its last arrival and, observed
//! inside an arbiter turn, no queue has a pending token or an uncrossed
//! arrival and no zone is held.
//!
//! Taking the turn means a claim in progress is either complete (its zones
//! are visible) or not yet started. A controller's front arrival stays in
//! its queue until after it releases its zones, so a car between its
//! signal and its claim still counts as not drained.

use std::sync::Arc;

use tracing::{debug, info};

use crate::context::SharedContext;

pub(crate) struct CompletionMonitor {
    ctx: Arc<SharedContext>,
}

impl CompletionMonitor {
    pub fn new(ctx: Arc<SharedContext>) -> Self {
        Self { ctx }
    }

    /// Poll until drained or until shutdown is requested elsewhere.
    ///
    /// Returns `true` if this monitor observed the drain.
    pub fn run(self) -> bool {
        let ctx = &self.ctx;
        loop {
            if ctx.shutdown.is_requested() {
                debug!("monitor stopped before drain");
                return false;
            }
            if all_drained(ctx) {
                info!(at = ctx.clock.elapsed_seconds(), "all cars handled");
                ctx.shutdown.request();
                return true;
            }
            if ctx.shutdown.wait_for(ctx.timing.drain_poll) {
                debug!("monitor stopped before drain");
                return false;
            }
        }
    }
}

/// Whether every arrival has been delivered and has crossed, with no zone
/// left held.
pub(crate) fn all_drained(ctx: &SharedContext) -> bool {
    if !ctx.is_feed_done() {
        return false;
    }
    let _turn = ctx.arbiter.enter();
    ctx.queues
        .iter()
        .all(|q| q.pending() == 0 && q.is_empty())
        && ctx.zones.is_quiescent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use junction_core::{Arrival, Direction, Movement, Side, ZoneId};
    use junction_test_utils::RecordingSink;
    use std::thread;
    use std::time::Duration;

    fn ctx() -> Arc<SharedContext> {
        let config = SimConfig {
            drain_poll: Duration::from_millis(2),
            ..SimConfig::default()
        };
        Arc::new(SharedContext::new(&config, Arc::new(RecordingSink::new())))
    }

    #[test]
    fn not_drained_before_feed_finishes() {
        let ctx = ctx();
        assert!(!all_drained(&ctx));
        ctx.mark_feed_done();
        assert!(all_drained(&ctx));
    }

    #[test]
    fn uncrossed_arrival_blocks_drain() {
        let ctx = ctx();
        ctx.mark_feed_done();
        let movement = Movement::new(Side::East, Direction::Right);
        let queue = ctx.queue(movement).unwrap();
        queue.push(Arrival::new(0, Side::East, Direction::Right, 0));
        assert!(!all_drained(&ctx));

        // Token consumed but car still in the queue: claiming, not drained.
        assert_eq!(queue.wait(&ctx.shutdown), crate::queue::Wake::Arrival);
        assert!(!all_drained(&ctx));

        queue.pop_front();
        assert!(all_drained(&ctx));
    }

    #[test]
    fn held_zone_blocks_drain() {
        let ctx = ctx();
        ctx.mark_feed_done();
        let movement = Movement::new(Side::West, Direction::Right);
        {
            let turn = ctx.arbiter.enter();
            assert!(ctx.zones.try_acquire_all(&turn, &[ZoneId(2)], movement));
        }
        assert!(!all_drained(&ctx));
        ctx.zones.release_all(&[ZoneId(2)], movement);
        assert!(all_drained(&ctx));
    }

    #[test]
    fn monitor_requests_shutdown_once_drained() {
        let ctx = ctx();
        let monitor = CompletionMonitor::new(Arc::clone(&ctx));
        let handle = thread::spawn(move || monitor.run());
        thread::sleep(Duration::from_millis(10));
        assert!(!ctx.shutdown.is_requested());

        ctx.mark_feed_done();
        assert!(handle.join().unwrap());
        assert!(ctx.shutdown.is_requested());
    }

    #[test]
    fn external_shutdown_stops_monitor() {
        let ctx = ctx();
        let monitor = CompletionMonitor::new(Arc::clone(&ctx));
        let handle = thread::spawn(move || monitor.run());
        ctx.shutdown.request();
        assert!(!handle.join().unwrap());
    }
}
