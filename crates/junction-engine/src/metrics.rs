//! Run counters for the intersection.
//!
//! Controllers bump [`MetricCounters`] with relaxed atomics as they work;
//! [`RunMetrics`] is the plain snapshot handed back in the shutdown report.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected over one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Claim attempts made under the arbiter.
    pub claim_attempts: u64,
    /// Claim attempts rejected because a zone was held.
    pub claim_rejections: u64,
    /// Cars that finished crossing.
    pub cars_crossed: u64,
    /// Arrivals the feed delivered to queues.
    pub arrivals_delivered: u64,
}

/// Live counters shared by every worker thread.
#[derive(Debug, Default)]
pub(crate) struct MetricCounters {
    claim_attempts: AtomicU64,
    claim_rejections: AtomicU64,
    cars_crossed: AtomicU64,
    arrivals_delivered: AtomicU64,
}

impl MetricCounters {
    pub fn record_claim(&self, granted: bool) {
        self.claim_attempts.fetch_add(1, Ordering::Relaxed);
        if !granted {
            self.claim_rejections.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_crossing(&self) {
        self.cars_crossed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_arrival(&self) {
        self.arrivals_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunMetrics {
        RunMetrics {
            claim_attempts: self.claim_attempts.load(Ordering::Relaxed),
            claim_rejections: self.claim_rejections.load(Ordering::Relaxed),
            cars_crossed: self.cars_crossed.load(Ordering::Relaxed),
            arrivals_delivered: self.arrivals_delivered.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        assert_eq!(MetricCounters::default().snapshot(), RunMetrics::default());
    }

    #[test]
    fn rejections_count_as_attempts() {
        let counters = MetricCounters::default();
        counters.record_claim(false);
        counters.record_claim(false);
        counters.record_claim(true);
        counters.record_crossing();
        counters.record_arrival();
        let m = counters.snapshot();
        assert_eq!(m.claim_attempts, 3);
        assert_eq!(m.claim_rejections, 2);
        assert_eq!(m.cars_crossed, 1);
        assert_eq!(m.arrivals_delivered, 1);
    }
}
