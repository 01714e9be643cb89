//! Pre-wired aggregator construction.
//!
//! Wires the metric aggregator to its production adapters (sharded store,
//! system clock) behind a validating builder.

use crate::application::aggregator::{AggregatorConfig, ConfigError, MetricAggregator};
use crate::application::ports::Clock;
use crate::domain::key::MetricKey;
use crate::domain::value::MetricValue;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::store::ShardedStore;
use std::sync::Arc;
use std::time::Duration;

/// The aggregator type produced by [`AggregatorBuilder`].
pub type DefaultAggregator = MetricAggregator<Arc<ShardedStore<MetricKey, MetricValue>>>;

/// Error returned when building an aggregator fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Maximum bucket count must be greater than zero
    ZeroMaxBuckets,
    /// Configuration validation failed
    Config(ConfigError),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::ZeroMaxBuckets => {
                write!(f, "max_buckets must be greater than 0")
            }
            BuildError::Config(e) => {
                write!(f, "configuration error: {}", e)
            }
        }
    }
}

impl std::error::Error for BuildError {}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::Config(e)
    }
}

/// Builder for a production-wired [`MetricAggregator`].
///
/// # Examples
///
/// ```
/// use telemetry_guard::AggregatorBuilder;
/// use std::time::Duration;
///
/// let aggregator = AggregatorBuilder::new()
///     .with_max_buckets(2_000)
///     .with_flush_grace(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// # let _ = aggregator;
/// ```
#[derive(Debug)]
pub struct AggregatorBuilder {
    flush_interval: Duration,
    flush_grace: Duration,
    max_buckets: usize,
    clock: Option<Arc<dyn Clock>>,
}

impl AggregatorBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        let defaults = AggregatorConfig::default();
        Self {
            flush_interval: defaults.flush_interval,
            flush_grace: defaults.flush_grace,
            max_buckets: defaults.max_buckets,
            clock: None,
        }
    }

    /// Set the background flush interval.
    ///
    /// Validated when `build()` is called.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set how long a closed window lingers before it is flushed.
    pub fn with_flush_grace(mut self, grace: Duration) -> Self {
        self.flush_grace = grace;
        self
    }

    /// Set the maximum number of concurrently tracked buckets.
    ///
    /// Validated when `build()` is called.
    pub fn with_max_buckets(mut self, max_buckets: usize) -> Self {
        self.max_buckets = max_buckets;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the aggregator.
    ///
    /// # Errors
    /// Returns `BuildError::ZeroMaxBuckets` or a wrapped `ConfigError` when
    /// validation fails.
    pub fn build(self) -> Result<DefaultAggregator, BuildError> {
        if self.max_buckets == 0 {
            return Err(BuildError::ZeroMaxBuckets);
        }

        let config = AggregatorConfig::new(self.flush_interval)?
            .with_flush_grace(self.flush_grace)
            .with_max_buckets(self.max_buckets);

        let store = Arc::new(ShardedStore::new());
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };

        Ok(MetricAggregator::new(store, clock, config))
    }
}

impl Default for AggregatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultAggregator {
    /// Start building a production-wired aggregator.
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bucket::BUCKET_WIDTH_SECS;

    #[test]
    fn test_build_with_defaults() {
        let aggregator = AggregatorBuilder::new().build().unwrap();
        assert_eq!(
            aggregator.config().flush_interval,
            Duration::from_secs(BUCKET_WIDTH_SECS as u64)
        );
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_zero_max_buckets_rejected() {
        let result = AggregatorBuilder::new().with_max_buckets(0).build();
        assert!(matches!(result, Err(BuildError::ZeroMaxBuckets)));
    }

    #[test]
    fn test_zero_flush_interval_rejected() {
        let result = AggregatorBuilder::new()
            .with_flush_interval(Duration::from_secs(0))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::Config(ConfigError::ZeroFlushInterval))
        ));
    }

    #[test]
    fn test_settings_reach_config() {
        let aggregator = AggregatorBuilder::new()
            .with_flush_interval(Duration::from_secs(30))
            .with_flush_grace(Duration::from_secs(3))
            .with_max_buckets(42)
            .build()
            .unwrap();

        let config = aggregator.config();
        assert_eq!(config.flush_interval, Duration::from_secs(30));
        assert_eq!(config.flush_grace, Duration::from_secs(3));
        assert_eq!(config.max_buckets, 42);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            BuildError::ZeroMaxBuckets.to_string(),
            "max_buckets must be greater than 0"
        );
        assert_eq!(
            BuildError::from(ConfigError::ZeroFlushInterval).to_string(),
            "configuration error: flush interval must be greater than 0"
        );
    }
}
