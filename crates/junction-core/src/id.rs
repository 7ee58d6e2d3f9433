//! Strongly-typed identifiers: sides, directions, movements, cars, and zones.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseIdError;

/// Number of conflict zones the intersection is divided into.
pub const ZONE_COUNT: usize = 8;

/// Upper bound on the zones a single movement may require.
pub const MAX_ZONES_PER_MOVEMENT: usize = 4;

/// Number of movements that have a traffic light.
pub const MOVEMENT_COUNT: usize = 9;

/// The side of the intersection a car arrives at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Side {
    /// Arrives from the north, heading south.
    North = 0,
    /// Arrives from the east, heading west.
    East = 1,
    /// Arrives from the south, heading north.
    South = 2,
    /// Arrives from the west, heading east.
    West = 3,
}

impl Side {
    /// All sides in code order.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Numeric code used in the event log.
    pub fn code(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = ParseIdError;

    /// Accepts a case-insensitive name (`north`, `N`) or the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "0" => Ok(Self::North),
            "east" | "e" | "1" => Ok(Self::East),
            "south" | "s" | "2" => Ok(Self::South),
            "west" | "w" | "3" => Ok(Self::West),
            _ => Err(ParseIdError::new("side", s)),
        }
    }
}

/// The direction a car wants to take through the intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    /// Turn left.
    Left = 0,
    /// Go straight on.
    Straight = 1,
    /// Turn right.
    Right = 2,
}

impl Direction {
    /// All directions in code order.
    pub const ALL: [Direction; 3] = [Direction::Left, Direction::Straight, Direction::Right];

    /// Numeric code used in the event log.
    pub fn code(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Straight => "straight",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" | "0" => Ok(Self::Left),
            "straight" | "s" | "1" => Ok(Self::Straight),
            "right" | "r" | "2" => Ok(Self::Right),
            _ => Err(ParseIdError::new("direction", s)),
        }
    }
}

/// A (side, direction) pair: one entry lane with its own traffic light.
///
/// Any pair can be constructed, but only the nine in [`Movement::ALL`] are
/// modeled. The other three all exit east, and the east exit is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Movement {
    /// Entry side.
    pub side: Side,
    /// Requested direction.
    pub direction: Direction,
}

impl Movement {
    /// The modeled movements, in light order. A movement's position in this
    /// array is its dense [`index`](Movement::index).
    pub const ALL: [Movement; MOVEMENT_COUNT] = [
        Movement::new(Side::North, Direction::Right),
        Movement::new(Side::North, Direction::Straight),
        Movement::new(Side::East, Direction::Right),
        Movement::new(Side::East, Direction::Straight),
        Movement::new(Side::East, Direction::Left),
        Movement::new(Side::South, Direction::Straight),
        Movement::new(Side::South, Direction::Left),
        Movement::new(Side::West, Direction::Right),
        Movement::new(Side::West, Direction::Left),
    ];

    /// Construct a movement.
    pub const fn new(side: Side, direction: Direction) -> Self {
        Self { side, direction }
    }

    /// Dense index into [`Movement::ALL`], or `None` if not modeled.
    pub fn index(self) -> Option<usize> {
        Self::ALL.iter().position(|m| *m == self)
    }

    /// Whether this movement has a traffic light.
    pub fn is_modeled(self) -> bool {
        self.index().is_some()
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.side, self.direction)
    }
}

/// Identifies a car in the arrival schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub u32);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CarId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one of the [`ZONE_COUNT`] conflict zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub u8);

impl ZoneId {
    /// Slot index of this zone.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ZoneId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_modeled_movements_with_dense_indices() {
        for (i, m) in Movement::ALL.iter().enumerate() {
            assert_eq!(m.index(), Some(i));
        }
        let modeled = Side::ALL
            .iter()
            .flat_map(|&s| Direction::ALL.iter().map(move |&d| Movement::new(s, d)))
            .filter(|m| m.is_modeled())
            .count();
        assert_eq!(modeled, MOVEMENT_COUNT);
    }

    #[test]
    fn unmodeled_movements_all_exit_east() {
        assert!(!Movement::new(Side::North, Direction::Left).is_modeled());
        assert!(!Movement::new(Side::South, Direction::Right).is_modeled());
        assert!(!Movement::new(Side::West, Direction::Straight).is_modeled());
    }

    #[test]
    fn side_and_direction_parse_names_and_codes() {
        assert_eq!("NORTH".parse::<Side>(), Ok(Side::North));
        assert_eq!("3".parse::<Side>(), Ok(Side::West));
        assert_eq!("Straight".parse::<Direction>(), Ok(Direction::Straight));
        assert_eq!("r".parse::<Direction>(), Ok(Direction::Right));
        assert!("up".parse::<Side>().is_err());
        assert!("4".parse::<Direction>().is_err());
    }

    #[test]
    fn codes_match_event_log_numbering() {
        assert_eq!(Side::South.code(), 2);
        assert_eq!(Direction::Right.code(), 2);
    }
}
