//! User-facing [`Intersection`] API and shutdown sequence.
//!
//! # Threads
//!
//! ```text
//!  Feed thread            Light threads (9)                 Monitor thread
//!      |                        |                                |
//!      | sleep to release       | queue.wait() ◀─ signal          |
//!      | queue.push() ────────▶ | arbiter.enter()                | sleep(poll)
//!      |                        |   zones.try_acquire_all()      | arbiter.enter()
//!      | ...                    | drop turn                      |   all_drained()?
//!      | mark_feed_done()       | green, cross, red              |
//!      |                        | zones.release_all(), pop       | shutdown.request()
//!      |                        | ◀───────────── wakes all waiters ┘
//! ```
//!
//! [`Intersection::run_to_completion`] blocks until the monitor observes
//! the drain; [`Intersection::shutdown`] stops the run early. Either way
//! every thread is joined and a [`ShutdownReport`] comes back.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use junction_core::{EventSink, Movement, Schedule, MOVEMENT_COUNT};
use tracing::{info, warn};

use crate::config::{ConfigError, SimConfig};
use crate::context::SharedContext;
use crate::controller::{ControllerReport, MovementController};
use crate::feed::ArrivalFeed;
use crate::metrics::RunMetrics;
use crate::monitor::CompletionMonitor;

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from the shutdown sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Whether the monitor observed a full drain (as opposed to an early
    /// shutdown).
    pub drained: bool,
    /// Simulated seconds elapsed when the last thread was joined.
    pub elapsed_secs: u64,
    /// Wall-clock time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Arrivals the feed delivered before stopping.
    pub arrivals_delivered: usize,
    /// Per-light reports, in [`Movement::ALL`] order, for lights that
    /// joined cleanly.
    pub controllers: Vec<ControllerReport>,
    /// Number of light threads joined without panicking.
    pub controllers_joined: usize,
    /// Whether the feed thread was joined without panicking.
    pub feed_joined: bool,
    /// Whether the monitor thread was joined without panicking.
    pub monitor_joined: bool,
    /// Counters for the whole run.
    pub metrics: RunMetrics,
}

impl ShutdownReport {
    /// Every thread joined without panicking.
    pub fn is_clean(&self) -> bool {
        self.controllers_joined == MOVEMENT_COUNT && self.feed_joined && self.monitor_joined
    }
}

// ── ShutdownState ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownState {
    Running,
    Stopping,
    Stopped,
}

// ── Intersection ─────────────────────────────────────────────────

/// A running intersection: nine light threads, one feed, one monitor.
///
/// Dropping a running intersection shuts it down and joins its threads.
pub struct Intersection {
    ctx: Arc<SharedContext>,
    controllers: Vec<JoinHandle<ControllerReport>>,
    feed: Option<JoinHandle<usize>>,
    monitor: Option<JoinHandle<bool>>,
    state: ShutdownState,
}

impl Intersection {
    /// Validate `config`, set the clock's start mark, and spawn every thread.
    ///
    /// Nothing is spawned if validation fails. If a spawn fails, the threads
    /// already running are shut down and joined before the error returns.
    pub fn start(
        config: SimConfig,
        schedule: Schedule,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let ctx = Arc::new(SharedContext::new(&config, sink));
        let lights = Movement::ALL
            .iter()
            .map(|&m| MovementController::new(m, Arc::clone(&ctx)))
            .collect::<Result<Vec<_>, _>>()?;

        let arrivals = schedule.len();
        let mut world = Self {
            ctx: Arc::clone(&ctx),
            controllers: Vec::with_capacity(MOVEMENT_COUNT),
            feed: None,
            monitor: None,
            state: ShutdownState::Running,
        };

        for (light, movement) in lights.into_iter().zip(Movement::ALL) {
            let name = format!(
                "junction-light-{}-{}",
                movement.side.code(),
                movement.direction.code()
            );
            world.controllers.push(spawn_named(name, move || light.run())?);
        }

        let feed = ArrivalFeed::new(schedule, Arc::clone(&ctx));
        world.feed = Some(spawn_named("junction-feed".into(), move || feed.run())?);

        let monitor = CompletionMonitor::new(ctx);
        world.monitor = Some(spawn_named("junction-monitor".into(), move || monitor.run())?);

        info!(
            lights = MOVEMENT_COUNT,
            arrivals,
            crossing_secs = config.crossing_secs,
            "intersection started"
        );
        Ok(world)
    }

    /// Start an intersection and block until every car has crossed.
    pub fn run(
        config: SimConfig,
        schedule: Schedule,
        sink: Arc<dyn EventSink>,
    ) -> Result<ShutdownReport, ConfigError> {
        let mut world = Self::start(config, schedule, sink)?;
        Ok(world.run_to_completion())
    }

    /// Block until the monitor observes the drain, then join every thread.
    pub fn run_to_completion(&mut self) -> ShutdownReport {
        if self.state == ShutdownState::Stopped {
            return ShutdownReport::default();
        }
        let monitor = self.join_monitor();
        self.finish(Instant::now(), monitor)
    }

    /// Stop now: request shutdown, let crossing cars finish, join every
    /// thread. Safe to call more than once.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.state == ShutdownState::Stopped {
            return ShutdownReport::default();
        }
        let start = Instant::now();
        self.state = ShutdownState::Stopping;
        self.ctx.shutdown.request();
        let monitor = self.join_monitor();
        self.finish(start, monitor)
    }

    /// Whether the threads are still running.
    pub fn is_running(&self) -> bool {
        self.state == ShutdownState::Running && !self.ctx.shutdown.is_requested()
    }

    /// Returns `(joined, drained)`.
    fn join_monitor(&mut self) -> (bool, bool) {
        match self.monitor.take().map(JoinHandle::join) {
            Some(Ok(drained)) => (true, drained),
            Some(Err(_)) => {
                warn!("monitor thread panicked");
                (false, false)
            }
            None => (true, false),
        }
    }

    fn finish(
        &mut self,
        start: Instant,
        (monitor_joined, drained): (bool, bool),
    ) -> ShutdownReport {
        self.state = ShutdownState::Stopping;
        // Already requested by the monitor on drain; repeated in case the
        // monitor panicked.
        self.ctx.shutdown.request();

        let (feed_joined, arrivals_delivered) = match self.feed.take().map(JoinHandle::join) {
            Some(Ok(n)) => (true, n),
            Some(Err(_)) => {
                warn!("feed thread panicked");
                (false, 0)
            }
            None => (true, 0),
        };

        let mut controllers = Vec::with_capacity(self.controllers.len());
        for handle in self.controllers.drain(..) {
            match handle.join() {
                Ok(report) => controllers.push(report),
                Err(_) => warn!("light thread panicked"),
            }
        }

        self.state = ShutdownState::Stopped;
        let report = ShutdownReport {
            drained,
            elapsed_secs: self.ctx.clock.elapsed_seconds(),
            total_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            arrivals_delivered,
            controllers_joined: controllers.len(),
            controllers,
            feed_joined,
            monitor_joined,
            metrics: self.ctx.metrics.snapshot(),
        };
        info!(
            drained = report.drained,
            cars = report.metrics.cars_crossed,
            rejections = report.metrics.claim_rejections,
            at = report.elapsed_secs,
            "intersection stopped"
        );
        report
    }
}

impl Drop for Intersection {
    fn drop(&mut self) {
        if self.state != ShutdownState::Stopped {
            self.shutdown();
        }
    }
}

fn spawn_named<T, F>(name: String, f: F) -> Result<JoinHandle<T>, ConfigError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|e| ConfigError::ThreadSpawnFailed {
            reason: format!("{name}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use junction_core::{Arrival, Direction, Side, Topology};
    use junction_test_utils::RecordingSink;
    use std::time::Duration;

    fn fast_config() -> SimConfig {
        SimConfig {
            second: Duration::from_millis(10),
            crossing_secs: 2,
            retry_backoff: Duration::from_millis(1),
            drain_poll: Duration::from_millis(5),
            topology: Topology::standard(),
        }
    }

    #[test]
    fn invalid_config_spawns_nothing() {
        let config = SimConfig {
            retry_backoff: Duration::ZERO,
            ..fast_config()
        };
        let err = Intersection::start(config, Schedule::reference(), Arc::new(RecordingSink::new()))
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::ZeroRetryBackoff);
    }

    #[test]
    fn empty_schedule_drains_immediately() {
        let sink = Arc::new(RecordingSink::new());
        let report = Intersection::run(fast_config(), Schedule::default(), sink.clone()).unwrap();
        assert!(report.drained);
        assert!(report.is_clean());
        assert_eq!(report.arrivals_delivered, 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn lifecycle_run_to_completion() {
        let sink = Arc::new(RecordingSink::new());
        let schedule = Schedule::new(vec![
            Arrival::new(0, Side::North, Direction::Right, 0),
            Arrival::new(1, Side::North, Direction::Right, 0),
            Arrival::new(2, Side::East, Direction::Right, 1),
        ])
        .unwrap();
        let report = Intersection::run(fast_config(), schedule, sink.clone()).unwrap();

        assert!(report.drained);
        assert!(report.is_clean());
        assert_eq!(report.arrivals_delivered, 3);
        assert_eq!(report.metrics.cars_crossed, 3);
        assert_eq!(report.controllers.len(), MOVEMENT_COUNT);
        let crossed: u64 = report.controllers.iter().map(|c| c.cars_crossed).sum();
        assert_eq!(crossed, 3);
        assert_eq!(sink.events().len(), 6);
    }

    #[test]
    fn early_shutdown_is_prompt_and_not_drained() {
        let sink = Arc::new(RecordingSink::new());
        let schedule =
            Schedule::new(vec![Arrival::new(0, Side::West, Direction::Left, 10_000)]).unwrap();
        let mut world = Intersection::start(fast_config(), schedule, sink).unwrap();
        assert!(world.is_running());

        let start = Instant::now();
        let report = world.shutdown();
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(!report.drained);
        assert!(report.is_clean());
        assert_eq!(report.arrivals_delivered, 0);
        assert!(!world.is_running());

        // Second call is a no-op.
        assert_eq!(world.shutdown(), ShutdownReport::default());
    }

    #[test]
    fn drop_triggers_shutdown() {
        let world = Intersection::start(
            fast_config(),
            Schedule::reference(),
            Arc::new(RecordingSink::new()),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        drop(world);
        // If this doesn't hang, shutdown worked.
    }
}
