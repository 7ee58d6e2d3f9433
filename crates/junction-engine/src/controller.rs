//! The per-movement traffic light state machine.
//!
//! One [`MovementController`] runs on its own thread for each modeled
//! movement:
//!
//! ```text
//!   Idle ──signal──▶ Claiming ──granted──▶ Crossing ──red + release──▶ Idle
//!                       │
//!                       └──rejected: resignal, back off──▶ Idle
//! ```
//!
//! The claim happens inside an arbiter turn that is dropped before the
//! crossing starts, so crossings of disjoint movements overlap while claim
//! decisions never interleave. Zones freeing up do not wake anyone; a
//! rejected controller re-posts its own signal and polls again after
//! `retry_backoff`.
//!
//! Shutdown is observed at the loop head, while blocked on the signal, and
//! again right after a token is taken.
//! The crossing sleep is never interrupted, so a controller always releases
//! its zones before it exits.

use std::sync::Arc;
use std::thread;

use junction_core::{Arrival, LightEvent, Movement, TopologyError, ZoneSet};
use tracing::{debug, info, trace};

use crate::config::ConfigError;
use crate::context::SharedContext;
use crate::queue::{MovementQueue, Wake};

/// Where a controller is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ControllerState {
    /// Waiting for a pending arrival.
    Idle,
    /// Trying to take every zone the movement needs.
    Claiming,
    /// Holding the zones while the front car crosses.
    Crossing,
}

/// What a controller did before it stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerReport {
    /// The controller's movement.
    pub movement: Movement,
    /// Cars that crossed on this light.
    pub cars_crossed: u64,
    /// Claims rejected because a zone was held.
    pub claim_failures: u64,
}

pub(crate) struct MovementController {
    movement: Movement,
    zones: ZoneSet,
    ctx: Arc<SharedContext>,
    state: ControllerState,
    report: ControllerReport,
}

impl MovementController {
    pub fn new(movement: Movement, ctx: Arc<SharedContext>) -> Result<Self, ConfigError> {
        let zones = ctx
            .topology
            .zones(movement)
            .ok_or(TopologyError::MissingMovement { movement })?
            .into();
        if ctx.queue(movement).is_none() {
            return Err(TopologyError::UnmodeledMovement { movement }.into());
        }
        Ok(Self {
            movement,
            zones,
            ctx,
            state: ControllerState::Idle,
            report: ControllerReport {
                movement,
                cars_crossed: 0,
                claim_failures: 0,
            },
        })
    }

    /// Main loop. Runs until shutdown is requested.
    pub fn run(mut self) -> ControllerReport {
        let ctx = Arc::clone(&self.ctx);
        let Some(queue) = ctx.queue(self.movement) else {
            return self.report;
        };
        debug!(movement = %self.movement, zones = ?self.zones.as_slice(), "light started");

        loop {
            if ctx.shutdown.is_requested() {
                break;
            }

            if !self.wait_for_arrival(queue) {
                break;
            }
            self.transition(ControllerState::Claiming);

            let Some(arrival) = queue.front() else {
                // Tokens are posted after the arrival is appended, so this
                // only happens if the queue was drained underneath us.
                self.transition(ControllerState::Idle);
                continue;
            };

            if self.claim() {
                self.cross(queue, arrival);
            } else {
                self.back_off(queue, arrival);
            }
        }

        info!(
            movement = %self.movement,
            cars = self.report.cars_crossed,
            rejections = self.report.claim_failures,
            "light stopped"
        );
        self.report
    }

    /// Block on the lane's signal. Returns `false` if the controller should
    /// stop instead of claiming.
    ///
    /// A token and the shutdown listener can be ready together, and `select!`
    /// picks between them at random, so shutdown is checked again after a
    /// token is taken.
    fn wait_for_arrival(&self, queue: &MovementQueue) -> bool {
        queue.wait(&self.ctx.shutdown) == Wake::Arrival && !self.ctx.shutdown.is_requested()
    }

    /// One claim attempt inside an arbiter turn. The turn is dropped on
    /// return, before any crossing starts.
    fn claim(&mut self) -> bool {
        let turn = self.ctx.arbiter.enter();
        let granted = self
            .ctx
            .zones
            .try_acquire_all(&turn, &self.zones, self.movement);
        self.ctx.metrics.record_claim(granted);
        granted
    }

    fn cross(&mut self, queue: &MovementQueue, arrival: Arrival) {
        self.transition(ControllerState::Crossing);
        let ctx = &self.ctx;

        ctx.emit(LightEvent::Green {
            movement: self.movement,
            time: ctx.clock.elapsed_seconds(),
            car: arrival.id,
        });
        ctx.clock.sleep_for(ctx.timing.crossing_secs);
        ctx.emit(LightEvent::Red {
            movement: self.movement,
            time: ctx.clock.elapsed_seconds(),
        });

        ctx.zones.release_all(&self.zones, self.movement);
        queue.pop_front();
        ctx.metrics.record_crossing();
        self.report.cars_crossed += 1;
        self.transition(ControllerState::Idle);
    }

    fn back_off(&mut self, queue: &MovementQueue, arrival: Arrival) {
        trace!(movement = %self.movement, car = %arrival.id, "claim rejected");
        self.report.claim_failures += 1;
        queue.resignal();
        thread::sleep(self.ctx.timing.retry_backoff);
        self.transition(ControllerState::Idle);
    }

    fn transition(&mut self, next: ControllerState) {
        trace!(movement = %self.movement, from = ?self.state, to = ?next, "transition");
        self.state = next;
    }
}
