//! Junction: a threaded four-way intersection simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the junction sub-crates, plus the `junction` command-line binary.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use junction::prelude::*;
//!
//! struct Discard;
//! impl EventSink for Discard {
//!     fn record(&self, _event: &LightEvent) {}
//! }
//!
//! let config = SimConfig {
//!     second: Duration::from_millis(2),
//!     crossing_secs: 1,
//!     drain_poll: Duration::from_millis(2),
//!     ..SimConfig::default()
//! };
//! let report = Intersection::run(config, Schedule::reference(), Arc::new(Discard)).unwrap();
//! assert!(report.drained);
//! assert_eq!(report.metrics.cars_crossed, 4);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `junction-core` | IDs, topology, schedule, events, errors |
//! | [`engine`] | `junction-engine` | Threads, zone registry, intersection runner |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, the conflict topology, and the arrival schedule
/// (`junction-core`).
pub use junction_core as types;

/// The threaded engine (`junction-engine`).
///
/// [`engine::Intersection`] starts the light, feed, and monitor threads and
/// returns an [`engine::ShutdownReport`] once they are joined.
pub use junction_engine as engine;

/// Common imports for typical junction usage.
pub mod prelude {
    // Core types
    pub use junction_core::{
        Arrival, CarId, Direction, EventSink, LightEvent, Movement, Schedule, Side, Topology,
        ZoneId,
    };

    // Errors
    pub use junction_core::{ScheduleError, TopologyError};

    // Engine
    pub use junction_engine::{
        ConfigError, Intersection, RunMetrics, ShutdownReport, SimConfig, StdoutSink,
    };
}
