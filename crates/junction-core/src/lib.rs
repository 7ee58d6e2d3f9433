//! Core types for the junction intersection simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identifiers (sides, directions, movements, zones, cars), the conflict
//! [`Topology`], the arrival [`Schedule`], the [`LightEvent`] log, and the
//! configuration error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod id;
pub mod schedule;
pub mod topology;
pub mod traits;

pub use error::{ParseIdError, ScheduleError, TopologyError};
pub use event::LightEvent;
pub use id::{
    CarId, Direction, Movement, Side, ZoneId, MAX_ZONES_PER_MOVEMENT, MOVEMENT_COUNT, ZONE_COUNT,
};
pub use schedule::{Arrival, Schedule};
pub use topology::{Topology, ZoneSet};
pub use traits::EventSink;
