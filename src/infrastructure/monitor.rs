//! Blocking-call monitor.
//!
//! The consumer of the suppression and recursion guards. An instrumentation
//! hook (owned by the surrounding runtime integration) calls
//! [`BlockingMonitor::report_blocking`] when it observes a synchronous block
//! on an async-capable thread; the monitor decides whether the signal is
//! genuine and, if so, emits a structured `tracing` event.
//!
//! Three things can swallow a signal:
//! - the reporting thread is suppressed (the hook, or code it called into,
//!   marked its own work as not-to-be-observed),
//! - the report re-entered an active handling region (the handler's own
//!   work triggered the instrumentation again), or
//! - nothing, in which case the signal is emitted, with suppression held
//!   for the duration of handling so the emission itself cannot re-trigger.

use crate::domain::guard::{self, RecursionScope, SuppressionScope};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Decides whether blocking-detection signals are genuine and emits them.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct BlockingMonitor {
    stats: MonitorStats,
}

impl BlockingMonitor {
    /// Create a new monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that a blocking call was observed on the current thread.
    ///
    /// Suppressed and re-entrant reports are dropped (and counted);
    /// otherwise a `tracing::warn!` event is emitted.
    pub fn report_blocking(&self) {
        if guard::is_suppressed() {
            self.stats.record_suppressed();
            return;
        }

        let scope = RecursionScope::enter();
        if scope.is_reentrant() {
            self.stats.record_reentrant();
            return;
        }

        // Handling must not observe itself.
        let _suppression = SuppressionScope::enter();

        let thread = std::thread::current();
        tracing::warn!(
            thread = thread.name().unwrap_or("<unnamed>"),
            "synchronous blocking call detected on an async-capable thread"
        );
        self.stats.record_emitted();
    }

    /// Run listener-side work with suppression held on the current thread.
    ///
    /// Any blocking the closure itself causes will not be reported.
    pub fn run_suppressed<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        guard::run_suppressed(f)
    }

    /// Get the monitor's outcome counters.
    pub fn stats(&self) -> MonitorStats {
        self.stats.clone()
    }
}

/// Outcome counters for reported blocking signals.
#[derive(Debug, Clone, Default)]
pub struct MonitorStats {
    inner: Arc<MonitorStatsInner>,
}

#[derive(Debug, Default)]
struct MonitorStatsInner {
    emitted: AtomicU64,
    suppressed: AtomicU64,
    reentrant: AtomicU64,
}

impl MonitorStats {
    fn record_emitted(&self) {
        self.inner.emitted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_suppressed(&self) {
        self.inner.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_reentrant(&self) {
        self.inner.reentrant.fetch_add(1, Ordering::Relaxed);
    }

    /// Signals that resulted in an emitted detection event.
    pub fn emitted(&self) -> u64 {
        self.inner.emitted.load(Ordering::Relaxed)
    }

    /// Signals dropped because the reporting thread was suppressed.
    pub fn suppressed(&self) -> u64 {
        self.inner.suppressed.load(Ordering::Relaxed)
    }

    /// Signals dropped as re-entrant reports.
    pub fn reentrant(&self) -> u64 {
        self.inner.reentrant.load(Ordering::Relaxed)
    }
}
