//! Arrivals and the static schedule that replays them.

use std::collections::HashSet;
use std::str::FromStr;

use crate::error::ScheduleError;
use crate::id::{CarId, Direction, Movement, Side};

/// One car arriving at the intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Arrival {
    /// Car identifier, reported in green events.
    pub id: CarId,
    /// The lane the car joins.
    pub movement: Movement,
    /// Simulated second at which the car arrives, relative to the start mark.
    pub release_time: u64,
}

impl Arrival {
    /// Construct an arrival.
    pub fn new(id: u32, side: Side, direction: Direction, release_time: u64) -> Self {
        Self {
            id: CarId(id),
            movement: Movement::new(side, direction),
            release_time,
        }
    }
}

/// A validated, time-ordered list of arrivals.
///
/// Release times are nondecreasing, car ids are unique, and every arrival
/// targets a modeled movement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule {
    arrivals: Vec<Arrival>,
}

impl Schedule {
    /// Validate and wrap a list of arrivals.
    pub fn new(arrivals: Vec<Arrival>) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::with_capacity(arrivals.len());
        let mut previous = 0;
        for arrival in &arrivals {
            if !arrival.movement.is_modeled() {
                return Err(ScheduleError::UnmodeledMovement {
                    car: arrival.id,
                    movement: arrival.movement,
                });
            }
            if arrival.release_time < previous {
                return Err(ScheduleError::OutOfOrder {
                    car: arrival.id,
                    release_time: arrival.release_time,
                    previous,
                });
            }
            if !seen.insert(arrival.id) {
                return Err(ScheduleError::DuplicateCar { car: arrival.id });
            }
            previous = arrival.release_time;
        }
        Ok(Self { arrivals })
    }

    /// The four-car reference schedule.
    pub fn reference() -> Self {
        Self {
            arrivals: vec![
                Arrival::new(0, Side::North, Direction::Straight, 0),
                Arrival::new(1, Side::South, Direction::Left, 1),
                Arrival::new(2, Side::East, Direction::Straight, 7),
                Arrival::new(3, Side::West, Direction::Right, 13),
            ],
        }
    }

    /// Arrivals in release order.
    pub fn arrivals(&self) -> &[Arrival] {
        &self.arrivals
    }

    /// Number of arrivals.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    /// Whether the schedule has no arrivals.
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Arrivals for one movement, in release order.
    pub fn for_movement(&self, movement: Movement) -> impl Iterator<Item = &Arrival> + '_ {
        self.arrivals
            .iter()
            .filter(move |a| a.movement == movement)
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    /// Parse one arrival per line: `id side direction time`.
    ///
    /// Blank lines and text after `#` are ignored. Sides and directions
    /// accept names or numeric codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut arrivals = Vec::new();
        for (i, raw) in s.lines().enumerate() {
            let line = i + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let fields: Vec<&str> = content
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|f| !f.is_empty())
                .collect();
            let [id, side, direction, time] = fields.as_slice() else {
                return Err(ScheduleError::Parse {
                    line,
                    reason: format!("expected 4 fields, found {}", fields.len()),
                });
            };
            let parse_err = |reason: String| ScheduleError::Parse { line, reason };
            let id: u32 = id
                .parse()
                .map_err(|_| parse_err(format!("invalid car id '{id}'")))?;
            let side: Side = side.parse().map_err(|e| parse_err(format!("{e}")))?;
            let direction: Direction = direction
                .parse()
                .map_err(|e| parse_err(format!("{e}")))?;
            let time: u64 = time
                .parse()
                .map_err(|_| parse_err(format!("invalid release time '{time}'")))?;
            arrivals.push(Arrival::new(id, side, direction, time));
        }
        Self::new(arrivals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_schedule_is_valid() {
        let reference = Schedule::reference();
        assert_eq!(Schedule::new(reference.arrivals().to_vec()), Ok(reference));
    }

    #[test]
    fn out_of_order_release_is_rejected() {
        let err = Schedule::new(vec![
            Arrival::new(0, Side::North, Direction::Straight, 4),
            Arrival::new(1, Side::East, Direction::Right, 2),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::OutOfOrder {
                car: CarId(1),
                release_time: 2,
                previous: 4
            }
        );
    }

    #[test]
    fn equal_release_times_are_allowed() {
        let schedule = Schedule::new(vec![
            Arrival::new(0, Side::North, Direction::Straight, 3),
            Arrival::new(1, Side::North, Direction::Straight, 3),
        ])
        .unwrap();
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn duplicate_car_and_unmodeled_movement_are_rejected() {
        assert_eq!(
            Schedule::new(vec![
                Arrival::new(7, Side::North, Direction::Right, 0),
                Arrival::new(7, Side::East, Direction::Right, 1),
            ]),
            Err(ScheduleError::DuplicateCar { car: CarId(7) })
        );
        assert!(matches!(
            Schedule::new(vec![Arrival::new(0, Side::West, Direction::Straight, 0)]),
            Err(ScheduleError::UnmodeledMovement { .. })
        ));
    }

    #[test]
    fn parses_text_schedule() {
        let text = "\
            # id side direction time
            0 north straight 0
            1 SOUTH left 1   # comment
            2, 1, 1, 7

            3 w r 13
        ";
        let schedule: Schedule = text.parse().unwrap();
        assert_eq!(schedule, Schedule::reference());
    }

    #[test]
    fn parse_reports_offending_line() {
        let err = "0 north straight 0\n1 up left 2\n"
            .parse::<Schedule>()
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Parse {
                line: 2,
                reason: "unknown side 'up'".into()
            }
        );

        let err = "0 north straight\n".parse::<Schedule>().unwrap_err();
        assert!(matches!(err, ScheduleError::Parse { line: 1, .. }));
    }

    #[test]
    fn for_movement_preserves_order() {
        let schedule = Schedule::new(vec![
            Arrival::new(4, Side::East, Direction::Left, 0),
            Arrival::new(2, Side::North, Direction::Right, 1),
            Arrival::new(9, Side::East, Direction::Left, 2),
        ])
        .unwrap();
        let ids: Vec<u32> = schedule
            .for_movement(Movement::new(Side::East, Direction::Left))
            .map(|a| a.id.0)
            .collect();
        assert_eq!(ids, vec![4, 9]);
    }
}
