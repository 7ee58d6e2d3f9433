//! Checks over a recorded event timeline.
//!
//! The timeline is the sequence a [`RecordingSink`](crate::RecordingSink)
//! captured. A controller emits green after taking its zones and red before
//! releasing them, so replaying the sequence in order reconstructs which
//! movements held zones at every point.

use std::collections::HashMap;

use junction_core::{CarId, LightEvent, Movement, Schedule, Topology};

/// One car's green-to-red interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crossing {
    pub movement: Movement,
    pub car: CarId,
    pub green: u64,
    pub red: u64,
}

/// Pair every green with the following red on the same light.
///
/// Fails on a red without a green, a second green before the red, or a
/// green that never turned red.
pub fn crossings(events: &[LightEvent]) -> Result<Vec<Crossing>, String> {
    let mut open: HashMap<Movement, (CarId, u64)> = HashMap::new();
    let mut done = Vec::new();
    for (i, event) in events.iter().enumerate() {
        match *event {
            LightEvent::Green {
                movement,
                time,
                car,
            } => {
                if let Some((other, _)) = open.insert(movement, (car, time)) {
                    return Err(format!(
                        "event {i}: {movement} green for car {car} while car {other} still crossing"
                    ));
                }
            }
            LightEvent::Red { movement, time } => {
                let (car, green) = open
                    .remove(&movement)
                    .ok_or_else(|| format!("event {i}: {movement} red without green"))?;
                done.push(Crossing {
                    movement,
                    car,
                    green,
                    red: time,
                });
            }
        }
    }
    if let Some((movement, (car, _))) = open.into_iter().next() {
        return Err(format!("{movement} never turned red for car {car}"));
    }
    Ok(done)
}

/// No two conflicting lights are ever green at the same time.
pub fn check_collision_free(topology: &Topology, events: &[LightEvent]) -> Result<(), String> {
    let mut active: Vec<Movement> = Vec::new();
    for (i, event) in events.iter().enumerate() {
        let movement = event.movement();
        if event.is_green() {
            if let Some(other) = active.iter().find(|&&a| topology.conflicts(a, movement)) {
                return Err(format!(
                    "event {i}: {movement} turned green while conflicting {other} was green"
                ));
            }
            active.push(movement);
        } else {
            active.retain(|&a| a != movement);
        }
    }
    Ok(())
}

/// Each light served its cars in schedule order, and nothing else.
///
/// With `complete`, every scheduled car must have crossed; otherwise the
/// crossed cars must be a prefix of each light's schedule.
pub fn check_fifo(
    schedule: &Schedule,
    events: &[LightEvent],
    complete: bool,
) -> Result<(), String> {
    for movement in Movement::ALL {
        let expected: Vec<CarId> = schedule.for_movement(movement).map(|a| a.id).collect();
        let served: Vec<CarId> = events
            .iter()
            .filter_map(|e| match *e {
                LightEvent::Green { movement: m, car, .. } if m == movement => Some(car),
                _ => None,
            })
            .collect();
        let ok = if complete {
            served == expected
        } else {
            expected.starts_with(&served)
        };
        if !ok {
            return Err(format!(
                "{movement} served {served:?}, schedule order is {expected:?}"
            ));
        }
    }
    Ok(())
}

/// Pairs of lights that were green at the same point in the timeline.
pub fn overlapping_greens(events: &[LightEvent]) -> Vec<(Movement, Movement)> {
    let mut active: Vec<Movement> = Vec::new();
    let mut pairs = Vec::new();
    for event in events {
        let movement = event.movement();
        if event.is_green() {
            pairs.extend(active.iter().map(|&a| (a, movement)));
            active.push(movement);
        } else {
            active.retain(|&a| a != movement);
        }
    }
    pairs
}
