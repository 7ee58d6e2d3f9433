//! Light-state change events: the simulator's only user-visible output.

use std::fmt;

use crate::id::{CarId, Movement};

/// A traffic light changing colour.
///
/// `time` is the elapsed simulated second at which the change happened.
/// Green events carry the car that is about to cross; red events do not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightEvent {
    /// The movement's light turned green for `car`.
    Green {
        /// Which light.
        movement: Movement,
        /// Elapsed simulated seconds.
        time: u64,
        /// The car now crossing.
        car: CarId,
    },
    /// The movement's light turned red again.
    Red {
        /// Which light.
        movement: Movement,
        /// Elapsed simulated seconds.
        time: u64,
    },
}

impl LightEvent {
    /// The movement whose light changed.
    pub fn movement(&self) -> Movement {
        match self {
            Self::Green { movement, .. } | Self::Red { movement, .. } => *movement,
        }
    }

    /// Elapsed simulated seconds at the change.
    pub fn time(&self) -> u64 {
        match self {
            Self::Green { time, .. } | Self::Red { time, .. } => *time,
        }
    }

    /// Whether this is a green event.
    pub fn is_green(&self) -> bool {
        matches!(self, Self::Green { .. })
    }
}

/// Renders the exact event-log line, using numeric side/direction codes.
impl fmt::Display for LightEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green {
                movement,
                time,
                car,
            } => write!(
                f,
                "traffic light {} {} turns green at time {time} for car {car}",
                movement.side.code(),
                movement.direction.code(),
            ),
            Self::Red { movement, time } => write!(
                f,
                "traffic light {} {} turns red at time {time}",
                movement.side.code(),
                movement.direction.code(),
            ),
        }
    }
}
