//! Threaded intersection engine for the junction simulator.
//!
//! Nine movement controllers, one per traffic light, run on their own
//! threads. Each waits for cars on its lane, claims every conflict zone
//! its path needs in a single all-or-nothing step under a global
//! [`ClaimArbiter`](arbiter::ClaimArbiter), crosses, and releases. An
//! arrival feed replays the schedule and a completion monitor shuts
//! everything down once all cars have crossed. [`Intersection`] ties the
//! threads together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arbiter;
pub mod clock;
pub mod config;
mod context;
pub mod controller;
mod feed;
pub mod metrics;
mod monitor;
pub mod queue;
pub mod shutdown;
pub mod sink;
pub mod world;
pub mod zones;

pub use config::{ConfigError, SimConfig};
pub use controller::ControllerReport;
pub use metrics::RunMetrics;
pub use sink::StdoutSink;
pub use world::{Intersection, ShutdownReport};
