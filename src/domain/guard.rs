//! Thread-scoped suppression and re-entrancy tracking.
//!
//! Instrumentation hooks observing blocking behavior must not observe their
//! own handling work: emitting a detection event can itself block, which
//! would re-trigger the hook and loop forever. The counters here give a hook
//! a cheap, allocation-free way to say "I am doing instrumentation work on
//! this thread; ignore nested signals from me".
//!
//! Two independent per-thread counters are tracked:
//!
//! - the **suppression count**, raised around any work whose signals should
//!   be dropped, and
//! - the **recursion depth**, raised while inside a guarded handling region,
//!   used to detect that the region has been re-entered.
//!
//! Both live in thread-local storage. Threads never observe each other's
//! counters, so no locks or atomics are involved. The state is process-wide
//! but thread-sharded by construction; it needs no init or teardown beyond
//! normal thread lifecycle.
//!
//! # Pairing
//!
//! [`suppress`] and [`restore`] must be paired 1:1 on the same thread. Use
//! [`SuppressionScope`] (or [`run_suppressed`]) rather than calling them
//! directly: the scope releases on every exit path, including unwinding.
//! An unmatched `restore` drives the counter negative; that is a caller bug
//! and is intentionally not detected here.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static SUPPRESSION_COUNT: Cell<i32> = const { Cell::new(0) };
    static RECURSION_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Increment the calling thread's suppression counter.
///
/// Prefer [`SuppressionScope::enter`], which guarantees the matching
/// [`restore`] on drop.
pub fn suppress() {
    SUPPRESSION_COUNT.with(|count| count.set(count.get() + 1));
}

/// Decrement the calling thread's suppression counter.
///
/// Must be paired with a prior [`suppress`] on the same thread.
pub fn restore() {
    SUPPRESSION_COUNT.with(|count| count.set(count.get() - 1));
}

/// Whether the calling thread currently suppresses detection signals.
///
/// True iff the suppression counter is greater than zero. The event-producing
/// side checks this before emitting and drops the signal when true.
///
/// # Examples
///
/// ```
/// use telemetry_guard::{is_suppressed, SuppressionScope};
///
/// assert!(!is_suppressed());
/// {
///     let _scope = SuppressionScope::enter();
///     assert!(is_suppressed());
/// }
/// assert!(!is_suppressed());
/// ```
pub fn is_suppressed() -> bool {
    SUPPRESSION_COUNT.with(|count| count.get() > 0)
}

/// Current recursion depth of guarded regions on the calling thread.
///
/// Zero outside any [`RecursionScope`].
pub fn recursion_depth() -> u32 {
    RECURSION_DEPTH.with(|depth| depth.get())
}

/// Run a closure with suppression held on the calling thread.
///
/// Suppression is released on every exit path, including unwinding.
pub fn run_suppressed<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _scope = SuppressionScope::enter();
    f()
}

/// RAII scope holding one suppression increment on the calling thread.
///
/// Nested scopes compose: the thread stays suppressed until the outermost
/// scope is dropped. The scope is `!Send`: the decrement must happen on the
/// thread whose counter was incremented.
#[derive(Debug)]
pub struct SuppressionScope {
    _not_send: PhantomData<*const ()>,
}

impl SuppressionScope {
    /// Increment the suppression counter; decremented when the scope drops.
    pub fn enter() -> Self {
        suppress();
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for SuppressionScope {
    fn drop(&mut self) {
        restore();
    }
}

/// RAII scope tracking re-entry into a guarded handling region.
///
/// Distinct from suppression: suppression is raised intentionally around
/// work whose signals should be dropped, while depth detects that the
/// guarded region itself has been entered again before leaving (e.g. the
/// handler's own internals triggering the instrumentation category it is
/// handling). Also `!Send`, for the same reason as [`SuppressionScope`].
///
/// # Examples
///
/// ```
/// use telemetry_guard::RecursionScope;
///
/// let outer = RecursionScope::enter();
/// assert!(!outer.is_reentrant());
///
/// let inner = RecursionScope::enter();
/// assert!(inner.is_reentrant());
/// ```
#[derive(Debug)]
pub struct RecursionScope {
    depth: u32,
    _not_send: PhantomData<*const ()>,
}

impl RecursionScope {
    /// Enter a guarded region, incrementing the thread's depth counter.
    pub fn enter() -> Self {
        let depth = RECURSION_DEPTH.with(|cell| {
            let depth = cell.get() + 1;
            cell.set(depth);
            depth
        });
        Self {
            depth,
            _not_send: PhantomData,
        }
    }

    /// Depth at which this scope was entered (1 for the outermost).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether this scope re-entered an already-active guarded region.
    pub fn is_reentrant(&self) -> bool {
        self.depth > 1
    }
}

impl Drop for RecursionScope {
    fn drop(&mut self) {
        RECURSION_DEPTH.with(|cell| cell.set(cell.get() - 1));
    }
}
