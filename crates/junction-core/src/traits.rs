//! Core abstraction traits.

use std::sync::Arc;

use crate::event::LightEvent;

/// Destination for light-change events.
///
/// Called concurrently from every movement controller thread, so
/// implementations must serialise their own output. Emission order across
/// threads is the order in which `record` calls linearise.
pub trait EventSink: Send + Sync {
    /// Record one light change.
    fn record(&self, event: &LightEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn record(&self, event: &LightEvent) {
        (**self).record(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn record(&self, event: &LightEvent) {
        (**self).record(event);
    }
}
