//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for constructing an
//! [`Intersection`](crate::world::Intersection).
//! [`validate()`](SimConfig::validate) checks every knob and the topology
//! table at startup, before any thread is spawned.

use std::time::Duration;

use junction_core::{Topology, TopologyError};
use thiserror::Error;

// ── SimConfig ──────────────────────────────────────────────────────

/// Timing knobs and conflict table for one run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Wall-clock length of one simulated second. Default: 1 s.
    pub second: Duration,
    /// Simulated seconds a car needs to cross. Default: 5.
    pub crossing_secs: u64,
    /// Wall-clock pause after a rejected claim before the controller
    /// retries. Must be non-zero. Default: 10 ms.
    pub retry_backoff: Duration,
    /// Wall-clock interval between drain checks. Default: 1 s.
    pub drain_poll: Duration,
    /// Movement → zone requirement table. Default: [`Topology::standard`].
    pub topology: Topology,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            second: Duration::from_secs(1),
            crossing_secs: 5,
            retry_backoff: Duration::from_millis(10),
            drain_poll: Duration::from_secs(1),
            topology: Topology::standard(),
        }
    }
}

impl SimConfig {
    /// Check every knob and the topology table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.second.is_zero() {
            return Err(ConfigError::ZeroSecond);
        }
        if self.crossing_secs == 0 {
            return Err(ConfigError::ZeroCrossing);
        }
        if self.retry_backoff.is_zero() {
            return Err(ConfigError::ZeroRetryBackoff);
        }
        if self.drain_poll.is_zero() {
            return Err(ConfigError::ZeroDrainPoll);
        }
        self.topology.validate()?;
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors that stop an intersection from starting.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The topology table is invalid.
    #[error("topology: {0}")]
    Topology(#[from] TopologyError),
    /// `second` is zero.
    #[error("simulated second must be longer than zero")]
    ZeroSecond,
    /// `crossing_secs` is zero.
    #[error("crossing time must be at least one simulated second")]
    ZeroCrossing,
    /// `retry_backoff` is zero, which would busy-spin the arbiter.
    #[error("retry backoff must be non-zero")]
    ZeroRetryBackoff,
    /// `drain_poll` is zero.
    #[error("drain poll interval must be non-zero")]
    ZeroDrainPoll,
    /// A worker thread could not be spawned.
    #[error("thread spawn failed: {reason}")]
    ThreadSpawnFailed {
        /// Which thread failed and why.
        reason: String,
    },
}
