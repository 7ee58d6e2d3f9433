//! The claim arbiter: one global critical section for zone claims.
//!
//! Every claim attempt runs while holding an [`ArbiterTurn`]. Zone
//! acquisition itself is non-blocking, so the turn is short; it exists so
//! that two controllers never interleave partial acquisitions of
//! overlapping zone sets. [`ZoneRegistry::try_acquire_all`] takes the turn
//! as a proof argument, which makes claiming outside the arbiter a type
//! error. The completion monitor also takes a turn so that its drain check
//! cannot race an in-flight claim.
//!
//! [`ZoneRegistry::try_acquire_all`]: crate::zones::ZoneRegistry::try_acquire_all

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Global mutual-exclusion point for claim decisions.
#[derive(Debug, Default)]
pub struct ClaimArbiter {
    gate: Mutex<()>,
}

/// Exclusive hold on the arbiter. Released on drop.
///
/// A successful claimant must drop its turn before it starts crossing.
#[must_use = "the arbiter is released as soon as the turn is dropped"]
pub struct ArbiterTurn<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl ClaimArbiter {
    /// Create an idle arbiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the arbiter is free, then hold it.
    pub fn enter(&self) -> ArbiterTurn<'_> {
        ArbiterTurn {
            _guard: self.gate.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

}
