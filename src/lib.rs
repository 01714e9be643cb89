//! # telemetry-guard
//!
//! In-process diagnostic primitives for an application-monitoring client:
//! re-entrancy-safe suppression guards for blocking-call instrumentation,
//! and a metric pre-aggregation pipeline (time bucketing + identifier
//! sanitization) that sits upstream of a telemetry transport.
//!
//! This crate deliberately stops at the transport boundary. Flushed buckets
//! are handed to the caller as plain values; encoding, enveloping, delivery
//! and retry are someone else's job.
//!
//! ## Suppression guards
//!
//! An instrumentation hook that observes blocking behavior must not observe
//! its own handling work: emitting a detection event can itself block,
//! which would re-trigger the hook forever. The guard primitives give every
//! thread an independent suppression counter and recursion-depth counter,
//! held via RAII scopes:
//!
//! ```
//! use telemetry_guard::{is_suppressed, SuppressionScope};
//!
//! fn handle_detection() {
//!     // Work done inside this scope never re-triggers detection
//!     // on this thread, even if it blocks.
//!     let _scope = SuppressionScope::enter();
//!     // ... emit the event, capture a stack trace, etc.
//! }
//!
//! fn on_blocking_observed() {
//!     if is_suppressed() {
//!         return; // our own instrumentation work; drop the signal
//!     }
//!     handle_detection();
//! }
//! ```
//!
//! [`BlockingMonitor`] packages this decision logic and emits detections as
//! `tracing` events.
//!
//! Counters are thread-local: no locks, no atomics, and no cross-thread
//! visibility. Thread A holding suppression never affects thread B.
//!
//! ## Metric pre-aggregation
//!
//! Raw metric emissions (name, value, unit, tags, timestamp) are
//! canonicalized into wire-safe, time-bucketed keys and merged into one
//! aggregate entry per key:
//!
//! ```
//! use telemetry_guard::{AggregatorBuilder, MetricSample};
//! use std::time::SystemTime;
//!
//! let aggregator = AggregatorBuilder::new().build().unwrap();
//!
//! let now = SystemTime::now();
//! aggregator.record(MetricSample::counter("endpoint.hits", 1.0, now));
//! aggregator.record(
//!     MetricSample::distribution("endpoint.response_time", 57.0, now)
//!         .with_unit("millisecond")
//!         .with_tag("route", "user_index"),
//! );
//!
//! // On shutdown, or periodically:
//! for bucket in aggregator.flush_all() {
//!     // hand to the transport layer
//!     println!("{} @ {}: {:?}", bucket.name, bucket.bucket, bucket.value);
//! }
//! ```
//!
//! Samples emitted within the same 10-second window with the same sanitized
//! name, unit and tags collapse into a single [`MetricBucket`]. Four
//! aggregate kinds are supported: counters (summed), distributions (values
//! retained), gauges (last/min/max/sum/count summary), and sets (distinct
//! members).
//!
//! ### Sanitization
//!
//! Identifier sanitization never fails; it transforms. Names and tag
//! keys/values have invalid characters removed; units have them replaced
//! with `_`:
//!
//! ```
//! use telemetry_guard::{sanitize_unit, sanitize_value};
//!
//! assert_eq!(sanitize_value("response time (ms)"), "responsetimems");
//! assert_eq!(sanitize_unit("req/s"), "req_s");
//! ```
//!
//! The same transforms are applied inside [`MetricAggregator::record`], so
//! callers only reach for them directly when building keys by hand.
//!
//! ## Feature flags
//!
//! - `async`: background bucket flushing on a tokio task
//!   (`MetricAggregator::start_flusher`).
//! - `serde`: `Serialize`/`Deserialize` derives on flushed bucket types.
//! - `test-helpers`: expose `infrastructure::mocks` (e.g. `MockClock`)
//!   outside of test builds.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    bucket::{day_bucket_key, time_bucket_key, BUCKET_WIDTH_SECS, DAY_WIDTH_SECS},
    guard::{
        is_suppressed, recursion_depth, restore, run_suppressed, suppress, RecursionScope,
        SuppressionScope,
    },
    key::{MetricKey, MetricSample, SampleValue},
    sanitize::{sanitize_unit, sanitize_value},
    value::{GaugeSummary, MetricBucket, MetricValue},
};

pub use application::{
    aggregator::{AggregatorConfig, ConfigError, MetricAggregator},
    daily::{DailyFirstSeen, DayKey},
    ports::{Clock, Storage},
    stats::{AggregatorStats, StatsSnapshot},
};

pub use infrastructure::{
    builder::{AggregatorBuilder, BuildError, DefaultAggregator},
    clock::SystemClock,
    monitor::{BlockingMonitor, MonitorStats},
    store::ShardedStore,
};
