//! Canonical aggregation keys for metric samples.
//!
//! A raw metric emission carries a free-form name, unit and tags plus a
//! timestamp. Before a sample reaches the aggregation map, the emission is
//! canonicalized exactly once: the timestamp becomes a bucket key and every
//! identifier passes through sanitization. Samples that canonicalize to the
//! same [`MetricKey`] merge into one aggregate entry.

use crate::domain::bucket::time_bucket_key;
use crate::domain::sanitize::{sanitize_unit, sanitize_value};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Value carried by a single metric emission.
///
/// The variant selects the aggregate kind the sample merges into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    /// Additive contribution to a counter.
    Counter(f64),
    /// One observed value of a distribution.
    Distribution(f64),
    /// One observed value of a gauge.
    Gauge(f64),
    /// One member of a distinct-count set.
    Set(u32),
}

/// A raw metric emission, as produced by a metric-recording API.
///
/// Identifiers are kept raw here; canonicalization happens in
/// [`MetricKey::for_sample`] on the way into the aggregation map.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Free-form metric name.
    pub name: String,
    /// Free-form unit, empty for unitless metrics.
    pub unit: String,
    /// Free-form tag key/value pairs.
    pub tags: BTreeMap<String, String>,
    /// When the emission happened.
    pub timestamp: SystemTime,
    /// The emitted value.
    pub value: SampleValue,
}

impl MetricSample {
    fn new(name: impl Into<String>, value: SampleValue, timestamp: SystemTime) -> Self {
        Self {
            name: name.into(),
            unit: String::new(),
            tags: BTreeMap::new(),
            timestamp,
            value,
        }
    }

    /// A counter increment.
    pub fn counter(name: impl Into<String>, value: f64, timestamp: SystemTime) -> Self {
        Self::new(name, SampleValue::Counter(value), timestamp)
    }

    /// One distribution observation.
    pub fn distribution(name: impl Into<String>, value: f64, timestamp: SystemTime) -> Self {
        Self::new(name, SampleValue::Distribution(value), timestamp)
    }

    /// One gauge observation.
    pub fn gauge(name: impl Into<String>, value: f64, timestamp: SystemTime) -> Self {
        Self::new(name, SampleValue::Gauge(value), timestamp)
    }

    /// One set member.
    pub fn set(name: impl Into<String>, member: u32, timestamp: SystemTime) -> Self {
        Self::new(name, SampleValue::Set(member), timestamp)
    }

    /// Attach a unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Attach one tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Canonical, wire-safe aggregation key.
///
/// Two samples with the same key land in the same aggregate entry. Tags are
/// a `BTreeMap` so equal tag sets compare equal regardless of insertion
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey {
    /// Start of the 10-second aggregation window, in epoch seconds.
    pub bucket: i64,
    /// Sanitized metric name.
    pub name: String,
    /// Sanitized unit.
    pub unit: String,
    /// Sanitized tag pairs.
    pub tags: BTreeMap<String, String>,
}

impl MetricKey {
    /// Canonicalize a raw emission into its aggregation key.
    ///
    /// The timestamp is bucketed, the name and tag keys/values pass through
    /// value sanitization, and the unit through unit sanitization.
    pub fn for_sample(sample: &MetricSample) -> Self {
        Self {
            bucket: time_bucket_key(sample.timestamp),
            name: sanitize_value(&sample.name).into_owned(),
            unit: sanitize_unit(&sample.unit).into_owned(),
            tags: sample
                .tags
                .iter()
                .map(|(key, value)| {
                    (
                        sanitize_value(key).into_owned(),
                        sanitize_value(value).into_owned(),
                    )
                })
                .collect(),
        }
    }
}
