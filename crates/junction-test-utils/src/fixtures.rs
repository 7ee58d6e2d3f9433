//! Reusable arrival schedules.
//!
//! - [`reference`] — the four-car scenario with its known conflicts.
//! - [`contention`] — several cars on every light, all released at once.
//! - [`arb_schedule`] — proptest strategy over small random schedules.

use junction_core::{Arrival, CarId, Movement, Schedule};
use proptest::prelude::*;

/// The four-car reference schedule.
pub fn reference() -> Schedule {
    Schedule::reference()
}

/// `cars_per_light` cars on each of the nine lights, all released at
/// second 0. Car ids are assigned round-robin across lights.
pub fn contention(cars_per_light: u32) -> Schedule {
    let mut arrivals = Vec::new();
    let mut id = 0;
    for _ in 0..cars_per_light {
        for movement in Movement::ALL {
            arrivals.push(Arrival {
                id: CarId(id),
                movement,
                release_time: 0,
            });
            id += 1;
        }
    }
    build(arrivals)
}

/// One car per listed movement, all released at `release_time`.
pub fn simultaneous(movements: &[Movement], release_time: u64) -> Schedule {
    let arrivals = movements
        .iter()
        .zip(0u32..)
        .map(|(&movement, id)| Arrival {
            id: CarId(id),
            movement,
            release_time,
        })
        .collect();
    build(arrivals)
}

/// Random schedules of up to `max_cars` arrivals released within
/// `0..=max_release`.
pub fn arb_schedule(max_cars: usize, max_release: u64) -> impl Strategy<Value = Schedule> {
    prop::collection::vec((0..Movement::ALL.len(), 0..=max_release), 0..=max_cars).prop_map(
        |mut raw| {
            raw.sort_by_key(|&(_, t)| t);
            let arrivals = raw
                .into_iter()
                .zip(0u32..)
                .map(|((m, release_time), id)| Arrival {
                    id: CarId(id),
                    movement: Movement::ALL[m],
                    release_time,
                })
                .collect();
            build(arrivals)
        },
    )
}

fn build(arrivals: Vec<Arrival>) -> Schedule {
    Schedule::new(arrivals).expect("fixture schedules are valid by construction")
}
