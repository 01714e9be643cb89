//! Once-per-day tracking of metric names.
//!
//! Some per-metric work should happen at most once per UTC calendar day
//! (emitting metric metadata, for example). This component answers "is this
//! the first time this metric name was seen today?" using the daily bucket
//! key, with the name sanitized the same way the aggregation key is.

use crate::application::ports::Storage;
use crate::domain::bucket::day_bucket_key;
use crate::domain::sanitize::sanitize_value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::SystemTime;

/// Key of one (day, metric name) observation.
pub type DayKey = (i64, String);

/// Tracks which metric names have been seen on which UTC day.
///
/// Entries from previous days are pruned when a later day is first
/// observed, so the tracked set stays bounded by per-day cardinality.
#[derive(Debug)]
pub struct DailyFirstSeen<S>
where
    S: Storage<DayKey, ()>,
{
    store: S,
    latest_day: AtomicI64,
}

impl<S> DailyFirstSeen<S>
where
    S: Storage<DayKey, ()>,
{
    /// Create a tracker over the given storage.
    pub fn new(store: S) -> Self {
        Self {
            store,
            latest_day: AtomicI64::new(i64::MIN),
        }
    }

    /// Mark `name` as seen on the day containing `timestamp`.
    ///
    /// Returns true exactly once per sanitized name per UTC day; subsequent
    /// calls with the same name on the same day return false. A backdated
    /// timestamp from a day that was already pruned reports first-seen
    /// again, which errs on the side of repeating the once-per-day work.
    pub fn check_and_mark(&self, name: &str, timestamp: SystemTime) -> bool {
        let day = day_bucket_key(timestamp);

        let latest = self.latest_day.load(Ordering::Relaxed);
        if day > latest
            && self
                .latest_day
                .compare_exchange(latest, day, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
        {
            // Day rolled over; drop every earlier day's entries.
            self.store.drain_matching(|key, _| key.0 < day);
        }

        let key = (day, sanitize_value(name).into_owned());
        self.store.insert_if_absent(key, ())
    }

    /// Number of tracked (day, name) entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether nothing has been tracked yet.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
