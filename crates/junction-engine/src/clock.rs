//! Simulated-time clock.
//!
//! [`SimClock`] fixes a start mark and a wall-clock length for one
//! simulated second. All schedule times and event timestamps are whole
//! simulated seconds relative to the start mark.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic clock measuring whole simulated seconds since a start mark.
#[derive(Clone, Copy, Debug)]
pub struct SimClock {
    origin: Instant,
    second: Duration,
}

impl SimClock {
    /// Set the start mark to now. `second` is the wall-clock length of one
    /// simulated second and must be non-zero.
    pub fn start(second: Duration) -> Self {
        Self {
            origin: Instant::now(),
            second,
        }
    }

    /// Whole simulated seconds elapsed since the start mark (floored).
    pub fn elapsed_seconds(&self) -> u64 {
        let unit = self.second.as_nanos().max(1);
        u64::try_from(self.origin.elapsed().as_nanos() / unit).unwrap_or(u64::MAX)
    }

    /// Wall-clock span of `secs` simulated seconds.
    pub fn span(&self, secs: u64) -> Duration {
        let nanos = self.second.as_nanos().saturating_mul(u128::from(secs));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// The instant at which simulated second `secs` begins.
    pub fn instant_at(&self, secs: u64) -> Instant {
        self.origin + self.span(secs)
    }

    /// Block for `secs` simulated seconds.
    pub fn sleep_for(&self, secs: u64) {
        thread::sleep(self.span(secs));
    }
}
