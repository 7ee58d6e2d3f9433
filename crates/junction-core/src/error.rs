//! Error types for the junction simulator, organized by input: identifier
//! parsing, topology table, and arrival schedule.
//!
//! All of these are configuration errors. They are detected before any
//! thread is spawned and are never retried.

use thiserror::Error;

use crate::id::{CarId, Movement, ZoneId, MAX_ZONES_PER_MOVEMENT, ZONE_COUNT};

/// A side or direction name could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} '{input}'")]
pub struct ParseIdError {
    /// Which identifier was being parsed (`"side"`, `"direction"`).
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

impl ParseIdError {
    pub(crate) fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

/// Errors detected by [`Topology::validate`](crate::Topology::validate).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A modeled movement has no zone requirement entry.
    #[error("movement {movement} has no zone requirement entry")]
    MissingMovement {
        /// The movement without an entry.
        movement: Movement,
    },
    /// An entry exists for a movement that is not modeled.
    #[error("movement {movement} is not modeled by this intersection")]
    UnmodeledMovement {
        /// The unexpected movement.
        movement: Movement,
    },
    /// A movement requires more zones than a single path can cover.
    #[error(
        "movement {movement} requires {count} zones, maximum is {max}",
        max = MAX_ZONES_PER_MOVEMENT
    )]
    TooManyZones {
        /// The offending movement.
        movement: Movement,
        /// How many zones it listed.
        count: usize,
    },
    /// A zone id is outside `0..ZONE_COUNT`.
    #[error(
        "movement {movement} references zone {zone}, valid zones are 0..{limit}",
        limit = ZONE_COUNT
    )]
    ZoneOutOfRange {
        /// The offending movement.
        movement: Movement,
        /// The out-of-range zone.
        zone: ZoneId,
    },
    /// A zone is listed twice for the same movement.
    #[error("movement {movement} lists zone {zone} more than once")]
    DuplicateZone {
        /// The offending movement.
        movement: Movement,
        /// The repeated zone.
        zone: ZoneId,
    },
}

/// Errors detected while building or parsing a
/// [`Schedule`](crate::Schedule).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// An arrival targets a movement without a traffic light.
    #[error("car {car} arrives for unmodeled movement {movement}")]
    UnmodeledMovement {
        /// The car.
        car: CarId,
        /// Its movement.
        movement: Movement,
    },
    /// Release times decrease between consecutive arrivals.
    #[error("car {car} released at {release_time}s after a car released at {previous}s")]
    OutOfOrder {
        /// The car whose release time is too early.
        car: CarId,
        /// Its release time.
        release_time: u64,
        /// Release time of the preceding arrival.
        previous: u64,
    },
    /// Two arrivals share a car id.
    #[error("car id {car} appears more than once")]
    DuplicateCar {
        /// The repeated id.
        car: CarId,
    },
    /// A line of a textual schedule could not be parsed.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}
