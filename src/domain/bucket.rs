//! Time bucket key computation for metric aggregation.
//!
//! Samples emitted close together in time collapse into one aggregate entry.
//! The bucket key is the sample's UTC epoch-second count floored to a fixed
//! granularity: a sub-minute key for aggregation windows and a daily key for
//! once-per-day tracking.
//!
//! Both functions are pure and total: any `SystemTime` produces a key,
//! including pre-epoch values, and keys are monotonic non-decreasing in the
//! input. Flooring uses euclidean division so negative second counts round
//! toward negative infinity rather than toward zero; truncating division
//! would break monotonicity across the epoch.

use std::time::{SystemTime, UNIX_EPOCH};

/// Width of an aggregation window in seconds.
pub const BUCKET_WIDTH_SECS: i64 = 10;

/// Width of the daily bucket in seconds.
pub const DAY_WIDTH_SECS: i64 = 86_400;

/// Key of the 10-second aggregation window containing `timestamp`.
///
/// Returns epoch seconds floored to the nearest 10-second boundary.
/// Timestamps exactly on a boundary map to themselves.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
/// use telemetry_guard::time_bucket_key;
///
/// // 1970-01-01T01:01:36Z
/// let ts = UNIX_EPOCH + Duration::from_secs(3696);
/// assert_eq!(time_bucket_key(ts), 3690);
/// ```
pub fn time_bucket_key(timestamp: SystemTime) -> i64 {
    floor_to(epoch_seconds(timestamp), BUCKET_WIDTH_SECS)
}

/// Key of the UTC calendar day containing `timestamp`.
///
/// Returns the epoch-second count of that day's 00:00:00Z.
pub fn day_bucket_key(timestamp: SystemTime) -> i64 {
    floor_to(epoch_seconds(timestamp), DAY_WIDTH_SECS)
}

fn floor_to(seconds: i64, width: i64) -> i64 {
    seconds.div_euclid(width) * width
}

/// Whole seconds since the epoch, floored.
///
/// `SystemTime` represents pre-epoch instants as a positive distance before
/// the epoch; a fractional distance must still floor downward (1.5 s before
/// the epoch is second -2, not -1).
pub(crate) fn epoch_seconds(timestamp: SystemTime) -> i64 {
    match timestamp.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_secs() as i64,
        Err(err) => {
            let before = err.duration();
            let secs = before.as_secs() as i64;
            if before.subsec_nanos() == 0 {
                -secs
            } else {
                -secs - 1
            }
        }
    }
}
