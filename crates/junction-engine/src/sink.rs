//! Event sinks provided by the engine.

use std::io::{self, Write};

use junction_core::{EventSink, LightEvent};
use tracing::warn;

/// Writes each event as one line on stdout.
///
/// Stdout is locked for each line, so lines from concurrent controllers
/// never interleave.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl EventSink for StdoutSink {
    fn record(&self, event: &LightEvent) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{event}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write light event");
        }
    }
}
