//! The conflict-zone registry.
//!
//! Each zone is one atomic slot holding either [`ZONE_FREE`] or a tag for
//! the movement that holds it. Claims are all-or-nothing: a claim that
//! meets a held zone rolls back every slot it took before reporting
//! failure, so no partially acquired set is ever left behind.

use std::sync::atomic::{AtomicU8, Ordering};

use junction_core::{Direction, Movement, Side, ZoneId, ZoneSet, ZONE_COUNT};

use crate::arbiter::ArbiterTurn;

/// Sentinel value meaning "this zone is not held by any movement."
pub const ZONE_FREE: u8 = u8::MAX;

/// The intersection's mutually exclusive conflict zones.
#[derive(Debug)]
pub struct ZoneRegistry {
    slots: Box<[AtomicU8]>,
}

// Compile-time assertion: ZoneRegistry must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ZoneRegistry>();
};

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneRegistry {
    /// Create a registry of [`ZONE_COUNT`] free zones.
    pub fn new() -> Self {
        Self {
            slots: (0..ZONE_COUNT).map(|_| AtomicU8::new(ZONE_FREE)).collect(),
        }
    }

    /// Take every zone in `zones` for `holder`, or none of them.
    ///
    /// Never blocks. Returns `false` if any zone is already held (or out of
    /// range); in that case every zone taken during this call has already
    /// been released again.
    pub fn try_acquire_all(
        &self,
        _turn: &ArbiterTurn<'_>,
        zones: &[ZoneId],
        holder: Movement,
    ) -> bool {
        let tag = holder_tag(holder);
        for (taken, zone) in zones.iter().enumerate() {
            let acquired = self.slots.get(zone.index()).is_some_and(|slot| {
                slot.compare_exchange(ZONE_FREE, tag, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
            });
            if !acquired {
                self.release_all(&zones[..taken], holder);
                return false;
            }
        }
        true
    }

    /// Release the zones in `zones` that `holder` holds.
    ///
    /// Zones held by other movements, free zones, and out-of-range ids are
    /// left untouched.
    pub fn release_all(&self, zones: &[ZoneId], holder: Movement) {
        let tag = holder_tag(holder);
        for zone in zones {
            if let Some(slot) = self.slots.get(zone.index()) {
                let _ = slot.compare_exchange(tag, ZONE_FREE, Ordering::AcqRel, Ordering::Acquire);
            }
        }
    }

    /// The movement currently holding `zone`, if any.
    pub fn holder(&self, zone: ZoneId) -> Option<Movement> {
        let tag = self.slots.get(zone.index())?.load(Ordering::Acquire);
        movement_from_tag(tag)
    }

    /// Zones currently held by `holder`.
    pub fn held_by(&self, holder: Movement) -> ZoneSet {
        let tag = holder_tag(holder);
        (0..ZONE_COUNT)
            .filter(|&i| self.slots[i].load(Ordering::Acquire) == tag)
            .map(|i| ZoneId(i as u8))
            .collect()
    }

    /// Number of zones currently held.
    pub fn held_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.load(Ordering::Acquire) != ZONE_FREE)
            .count()
    }

    /// Whether no zone is held.
    pub fn is_quiescent(&self) -> bool {
        self.held_count() == 0
    }
}

fn holder_tag(movement: Movement) -> u8 {
    (movement.side.code() << 2) | movement.direction.code()
}

fn movement_from_tag(tag: u8) -> Option<Movement> {
    if tag == ZONE_FREE {
        return None;
    }
    let side = *Side::ALL.get(usize::from(tag >> 2))?;
    let direction = *Direction::ALL.get(usize::from(tag & 0b11))?;
    Some(Movement::new(side, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::ClaimArbiter;
    use junction_core::Topology;

    fn zones(ids: &[u8]) -> Vec<ZoneId> {
        ids.iter().copied().map(ZoneId).collect()
    }

    #[test]
    fn tags_round_trip_for_every_movement() {
        for m in Movement::ALL {
            assert_eq!(movement_from_tag(holder_tag(m)), Some(m));
        }
        assert_eq!(movement_from_tag(ZONE_FREE), None);
    }

    #[test]
    fn acquire_and_release() {
        let arbiter = ClaimArbiter::new();
        let registry = ZoneRegistry::new();
        let ns = Movement::new(Side::North, Direction::Straight);

        let turn = arbiter.enter();
        assert!(registry.try_acquire_all(&turn, &zones(&[0, 2, 6]), ns));
        drop(turn);
        assert_eq!(registry.held_count(), 3);
        assert_eq!(registry.holder(ZoneId(2)), Some(ns));
        assert_eq!(registry.held_by(ns).as_slice(), zones(&[0, 2, 6]).as_slice());

        registry.release_all(&zones(&[0, 2, 6]), ns);
        assert!(registry.is_quiescent());
    }

    #[test]
    fn contended_claim_rolls_back_partial_acquisition() {
        let arbiter = ClaimArbiter::new();
        let registry = ZoneRegistry::new();
        let wr = Movement::new(Side::West, Direction::Right);
        let el = Movement::new(Side::East, Direction::Left);

        let turn = arbiter.enter();
        assert!(registry.try_acquire_all(&turn, &zones(&[2, 6]), wr));
        // East-left takes 1 and 0 before meeting 2; both must be rolled back.
        assert!(!registry.try_acquire_all(&turn, &zones(&[1, 0, 2, 6]), el));
        drop(turn);

        assert_eq!(registry.holder(ZoneId(1)), None);
        assert_eq!(registry.holder(ZoneId(0)), None);
        assert_eq!(registry.held_count(), 2);
        assert!(registry.held_by(el).is_empty());
    }

    #[test]
    fn release_only_touches_own_zones() {
        let arbiter = ClaimArbiter::new();
        let registry = ZoneRegistry::new();
        let wr = Movement::new(Side::West, Direction::Right);
        let er = Movement::new(Side::East, Direction::Right);

        let turn = arbiter.enter();
        assert!(registry.try_acquire_all(&turn, &zones(&[2, 6]), wr));
        assert!(registry.try_acquire_all(&turn, &zones(&[1, 4]), er));
        drop(turn);

        registry.release_all(&zones(&[2, 6, 1]), er);
        assert_eq!(registry.holder(ZoneId(2)), Some(wr));
        assert_eq!(registry.holder(ZoneId(1)), None);
        assert_eq!(registry.holder(ZoneId(4)), Some(er));
    }

    #[test]
    fn out_of_range_zone_fails_cleanly() {
        let arbiter = ClaimArbiter::new();
        let registry = ZoneRegistry::new();
        let nr = Movement::new(Side::North, Direction::Right);
        let turn = arbiter.enter();
        assert!(!registry.try_acquire_all(&turn, &zones(&[0, 42]), nr));
        assert!(registry.is_quiescent());
        registry.release_all(&zones(&[42]), nr);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_movement() -> impl Strategy<Value = Movement> {
            (0..Movement::ALL.len()).prop_map(|i| Movement::ALL[i])
        }

        proptest! {
            /// Claiming movements in any order never lets two conflicting
            /// movements hold zones at once, and a rejected claim holds
            /// nothing.
            #[test]
            fn claims_never_overlap(order in prop::collection::vec(arb_movement(), 1..20)) {
                let topology = Topology::standard();
                let arbiter = ClaimArbiter::new();
                let registry = ZoneRegistry::new();
                let mut holders: Vec<Movement> = Vec::new();

                for m in order {
                    if holders.contains(&m) {
                        continue;
                    }
                    let required = topology.zones(m).unwrap();
                    let turn = arbiter.enter();
                    let granted = registry.try_acquire_all(&turn, required, m);
                    drop(turn);

                    let blocked = holders.iter().any(|&h| topology.conflicts(h, m));
                    prop_assert_eq!(granted, !blocked);
                    if granted {
                        holders.push(m);
                    } else {
                        prop_assert!(registry.held_by(m).is_empty());
                    }
                }

                let expected: usize = holders
                    .iter()
                    .map(|&h| topology.zones(h).unwrap().len())
                    .sum();
                prop_assert_eq!(registry.held_count(), expected);
            }
        }
    }
}
