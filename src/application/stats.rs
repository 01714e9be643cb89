//! Observability counters for the aggregation pipeline.
//!
//! Tracks how samples flow through the aggregator for monitoring and
//! debugging. All counters use atomic operations and can be read at any
//! time from any thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters tracking aggregator activity.
///
/// Cheap to clone; clones share the underlying counters.
#[derive(Debug, Clone)]
pub struct AggregatorStats {
    inner: Arc<StatsInner>,
}

#[derive(Debug)]
struct StatsInner {
    /// Samples merged into a bucket
    samples_recorded: AtomicU64,
    /// Samples dropped because the bucket map was full
    samples_dropped_capacity: AtomicU64,
    /// Samples dropped because their kind did not match the bucket's kind
    samples_dropped_mismatch: AtomicU64,
    /// Buckets handed to the caller by a flush
    buckets_flushed: AtomicU64,
}

impl AggregatorStats {
    /// Create a new stats tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StatsInner {
                samples_recorded: AtomicU64::new(0),
                samples_dropped_capacity: AtomicU64::new(0),
                samples_dropped_mismatch: AtomicU64::new(0),
                buckets_flushed: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_sample(&self) {
        self.inner.samples_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_capacity_drop(&self) {
        self.inner
            .samples_dropped_capacity
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_mismatch_drop(&self) {
        self.inner
            .samples_dropped_mismatch
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flushed(&self, buckets: u64) {
        self.inner
            .buckets_flushed
            .fetch_add(buckets, Ordering::Relaxed);
    }

    /// Total samples merged into buckets.
    pub fn samples_recorded(&self) -> u64 {
        self.inner.samples_recorded.load(Ordering::Relaxed)
    }

    /// Samples dropped because the bucket map was at capacity.
    pub fn samples_dropped_capacity(&self) -> u64 {
        self.inner.samples_dropped_capacity.load(Ordering::Relaxed)
    }

    /// Samples dropped because their kind conflicted with the bucket's.
    pub fn samples_dropped_mismatch(&self) -> u64 {
        self.inner.samples_dropped_mismatch.load(Ordering::Relaxed)
    }

    /// Total buckets handed out by flushes.
    pub fn buckets_flushed(&self) -> u64 {
        self.inner.buckets_flushed.load(Ordering::Relaxed)
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            samples_recorded: self.samples_recorded(),
            samples_dropped_capacity: self.samples_dropped_capacity(),
            samples_dropped_mismatch: self.samples_dropped_mismatch(),
            buckets_flushed: self.buckets_flushed(),
        }
    }
}

impl Default for AggregatorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of aggregator counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Samples merged into buckets
    pub samples_recorded: u64,
    /// Samples dropped at capacity
    pub samples_dropped_capacity: u64,
    /// Samples dropped on kind mismatch
    pub samples_dropped_mismatch: u64,
    /// Buckets handed out by flushes
    pub buckets_flushed: u64,
}

impl StatsSnapshot {
    /// Total samples seen, recorded or dropped.
    pub fn total_samples(&self) -> u64 {
        self.samples_recorded
            .saturating_add(self.samples_dropped_capacity)
            .saturating_add(self.samples_dropped_mismatch)
    }

    /// Ratio of dropped samples to total samples (0.0 to 1.0).
    ///
    /// Returns 0.0 when no samples have been seen.
    pub fn drop_rate(&self) -> f64 {
        let total = self.total_samples();
        if total == 0 {
            return 0.0;
        }
        let dropped = self
            .samples_dropped_capacity
            .saturating_add(self.samples_dropped_mismatch);
        dropped as f64 / total as f64
    }
}
