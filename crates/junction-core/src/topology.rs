//! The intersection's conflict table: which zones each movement occupies.
//!
//! [`Topology`] is the single source of truth for which movements may run
//! concurrently. Two movements conflict iff their zone sets intersect. The
//! table is asserted, not derived from geometry, so any caller-supplied
//! table must pass [`Topology::validate`] before a simulation starts.
//!
//! # Standard layout
//!
//! Right-hand traffic. Zones 0–3 are the centre cells, zones 4–7 the exit
//! lanes:
//!
//! ```text
//!            N exit (4)
//!        +-------+-------+
//!        | NW 0  | NE 1  |
//!  W (7) +-------+-------+ (5) E
//!        | SW 2  | SE 3  |
//!        +-------+-------+
//!            S exit (6)
//! ```

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::TopologyError;
use crate::id::{Direction, Movement, Side, ZoneId, MAX_ZONES_PER_MOVEMENT, ZONE_COUNT};

/// Ordered set of zones one movement occupies while crossing.
pub type ZoneSet = SmallVec<[ZoneId; MAX_ZONES_PER_MOVEMENT]>;

/// Static mapping from movement to required zones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    requirements: IndexMap<Movement, ZoneSet>,
}

impl Topology {
    /// Build a topology from an explicit table. Not validated.
    pub fn new(requirements: IndexMap<Movement, ZoneSet>) -> Self {
        Self { requirements }
    }

    /// The standard four-way layout described in the module docs.
    pub fn standard() -> Self {
        use Direction::*;
        use Side::*;

        let table: [(Side, Direction, &[u8]); 9] = [
            (North, Right, &[0, 7]),
            (North, Straight, &[0, 2, 6]),
            (East, Right, &[1, 4]),
            (East, Straight, &[1, 0, 7]),
            (East, Left, &[1, 0, 2, 6]),
            (South, Straight, &[3, 1, 4]),
            (South, Left, &[3, 1, 0, 7]),
            (West, Right, &[2, 6]),
            (West, Left, &[2, 3, 1, 4]),
        ];
        let requirements = table
            .iter()
            .map(|&(side, direction, zones)| {
                (
                    Movement::new(side, direction),
                    zones.iter().copied().map(ZoneId).collect(),
                )
            })
            .collect();
        Self { requirements }
    }

    /// Check that the table covers exactly the modeled movements and that
    /// every zone set is bounded, in range, and duplicate-free. An empty set
    /// is allowed: that movement conflicts with nothing.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if let Some(&movement) = self.requirements.keys().find(|m| !m.is_modeled()) {
            return Err(TopologyError::UnmodeledMovement { movement });
        }
        for movement in Movement::ALL {
            let zones = self
                .requirements
                .get(&movement)
                .ok_or(TopologyError::MissingMovement { movement })?;
            if zones.len() > MAX_ZONES_PER_MOVEMENT {
                return Err(TopologyError::TooManyZones {
                    movement,
                    count: zones.len(),
                });
            }
            let mut seen = [false; ZONE_COUNT];
            for &zone in zones {
                let slot = seen
                    .get_mut(zone.index())
                    .ok_or(TopologyError::ZoneOutOfRange { movement, zone })?;
                if *slot {
                    return Err(TopologyError::DuplicateZone { movement, zone });
                }
                *slot = true;
            }
        }
        Ok(())
    }

    /// Zones required by `movement`, or `None` if it has no entry.
    pub fn zones(&self, movement: Movement) -> Option<&[ZoneId]> {
        self.requirements.get(&movement).map(|z| z.as_slice())
    }

    /// Whether two movements share at least one zone.
    pub fn conflicts(&self, a: Movement, b: Movement) -> bool {
        match (self.zones(a), self.zones(b)) {
            (Some(za), Some(zb)) => za.iter().any(|z| zb.contains(z)),
            _ => false,
        }
    }

    /// Movements with an entry, in insertion order.
    pub fn movements(&self) -> impl Iterator<Item = Movement> + '_ {
        self.requirements.keys().copied()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::standard()
    }
}
