//! Metric pre-aggregation.
//!
//! The aggregator sits between a metric-recording API and a telemetry
//! transport. Every emission is canonicalized (bucketed and sanitized) into
//! a [`MetricKey`] and merged into the entry for that key; a flush drains
//! closed windows and hands the accumulated buckets to the caller. What
//! happens to flushed buckets (encoding, enveloping, delivery) is the
//! caller's business.

use crate::application::ports::{Clock, Storage};
use crate::application::stats::AggregatorStats;
use crate::domain::bucket::{epoch_seconds, BUCKET_WIDTH_SECS};
use crate::domain::key::{MetricKey, MetricSample};
use crate::domain::value::{MetricBucket, MetricValue};
use std::sync::Arc;
use std::time::Duration;

/// Error returned when aggregator configuration validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Flush interval duration must be greater than zero
    ZeroFlushInterval,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroFlushInterval => {
                write!(f, "flush interval must be greater than 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for metric aggregation.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// How often the background flusher drains due buckets
    pub flush_interval: Duration,
    /// How long after a window closes before its bucket becomes due
    pub flush_grace: Duration,
    /// Maximum number of concurrently tracked buckets
    pub max_buckets: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(BUCKET_WIDTH_SECS as u64),
            flush_grace: Duration::from_secs(BUCKET_WIDTH_SECS as u64),
            max_buckets: 5_000,
        }
    }
}

impl AggregatorConfig {
    /// Create a config with the specified flush interval.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroFlushInterval` if `flush_interval` is zero.
    pub fn new(flush_interval: Duration) -> Result<Self, ConfigError> {
        if flush_interval.is_zero() {
            return Err(ConfigError::ZeroFlushInterval);
        }
        Ok(Self {
            flush_interval,
            ..Self::default()
        })
    }

    /// Set how long a closed window lingers before it is flushed.
    ///
    /// A non-zero grace absorbs slightly backdated emissions (e.g. async
    /// continuations recording against their start time).
    pub fn with_flush_grace(mut self, flush_grace: Duration) -> Self {
        self.flush_grace = flush_grace;
        self
    }

    /// Set the maximum number of concurrently tracked buckets.
    ///
    /// Samples that would create a bucket beyond the cap are dropped and
    /// counted. Validated when the aggregator is built.
    pub fn with_max_buckets(mut self, max_buckets: usize) -> Self {
        self.max_buckets = max_buckets;
        self
    }
}

/// Pre-aggregates metric samples into time-bucketed entries.
///
/// Generic over the storage implementation; in production, use
/// `Arc<ShardedStore>` (see the builder in the infrastructure layer).
/// Cloning shares storage, clock and stats.
#[derive(Debug, Clone)]
pub struct MetricAggregator<S>
where
    S: Storage<MetricKey, MetricValue> + Clone,
{
    store: S,
    clock: Arc<dyn Clock>,
    config: AggregatorConfig,
    stats: AggregatorStats,
}

impl<S> MetricAggregator<S>
where
    S: Storage<MetricKey, MetricValue> + Clone,
{
    /// Create an aggregator from its parts.
    pub fn new(store: S, clock: Arc<dyn Clock>, config: AggregatorConfig) -> Self {
        Self {
            store,
            clock,
            config,
            stats: AggregatorStats::new(),
        }
    }

    /// Record one metric emission.
    ///
    /// The sample is canonicalized and merged into its bucket. This never
    /// fails: samples that cannot be accommodated (bucket map at capacity,
    /// or a kind conflict with the existing entry) are dropped and counted
    /// in [`stats`](Self::stats).
    pub fn record(&self, sample: MetricSample) {
        let key = MetricKey::for_sample(&sample);

        // Soft cap: only new keys are refused once the map is full.
        if self.store.len() >= self.config.max_buckets && !self.store.contains(&key) {
            self.stats.record_capacity_drop();
            tracing::debug!(metric = %key.name, "bucket map at capacity, dropping sample");
            return;
        }

        let value = sample.value;
        let merged = self.store.with_entry_mut(
            key,
            || MetricValue::identity_for(value),
            |aggregate| aggregate.merge(value),
        );

        if merged {
            self.stats.record_sample();
        } else {
            self.stats.record_mismatch_drop();
        }
    }

    /// Drain buckets whose window has been closed for at least the grace
    /// period, ordered by key.
    pub fn flush_due(&self) -> Vec<MetricBucket> {
        let now = epoch_seconds(self.clock.now());
        let grace = self.config.flush_grace.as_secs() as i64;
        self.flush_where(move |key| key.bucket + BUCKET_WIDTH_SECS + grace <= now)
    }

    /// Drain every bucket regardless of age (shutdown path).
    pub fn flush_all(&self) -> Vec<MetricBucket> {
        self.flush_where(|_| true)
    }

    fn flush_where(&self, due: impl Fn(&MetricKey) -> bool) -> Vec<MetricBucket> {
        let mut drained = self.store.drain_matching(|key, _| due(key));
        if drained.is_empty() {
            return Vec::new();
        }
        drained.sort_by(|a, b| a.0.cmp(&b.0));
        self.stats.record_flushed(drained.len() as u64);
        tracing::debug!(buckets = drained.len(), "flushed metric buckets");
        drained
            .into_iter()
            .map(|(key, value)| MetricBucket::from_entry(key, value))
            .collect()
    }

    /// Number of currently tracked buckets.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no buckets are currently tracked.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get the aggregator's activity counters.
    pub fn stats(&self) -> AggregatorStats {
        self.stats.clone()
    }

    /// Get the aggregator configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Start flushing due buckets periodically (async version).
    ///
    /// Spawns a background task that drains due buckets at the configured
    /// flush interval and hands non-empty batches to `emit_fn`. Clone the
    /// aggregator first if you still need to record on this handle.
    #[cfg(feature = "async")]
    pub fn start_flusher<F>(self, mut emit_fn: F) -> tokio::task::JoinHandle<()>
    where
        F: FnMut(Vec<MetricBucket>) + Send + 'static,
        S: Send + Sync + 'static,
    {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.flush_interval);

            loop {
                ticker.tick().await;
                let buckets = self.flush_due();

                if !buckets.is_empty() {
                    emit_fn(buckets);
                }
            }
        })
    }
}
