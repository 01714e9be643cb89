use std::sync::mpsc;
use telemetry_guard::{
    is_suppressed, recursion_depth, restore, suppress, BlockingMonitor, RecursionScope,
    SuppressionScope,
};

// Each test runs its guard interactions on a dedicated thread so the
// thread-local counters start from a clean slate regardless of how the test
// harness schedules tests onto threads.
fn on_fresh_thread(f: impl FnOnce() + Send + 'static) {
    std::thread::spawn(f).join().unwrap();
}

#[test]
fn test_fresh_thread_is_not_suppressed() {
    on_fresh_thread(|| {
        assert!(!is_suppressed());
        assert_eq!(recursion_depth(), 0);
    });
}

#[test]
fn test_n_suppressions_need_n_restores() {
    on_fresh_thread(|| {
        let n = 5;
        for _ in 0..n {
            suppress();
        }
        for _ in 0..n - 1 {
            restore();
        }
        assert!(is_suppressed(), "N-1 restores leave the thread suppressed");

        restore();
        assert!(!is_suppressed(), "the Nth restore re-enables detection");
    });
}

#[test]
fn test_scopes_balance_across_unwinding() {
    on_fresh_thread(|| {
        let caught = std::panic::catch_unwind(|| {
            let _outer = SuppressionScope::enter();
            let _inner = SuppressionScope::enter();
            panic!("unwind through two scopes");
        });
        assert!(caught.is_err());
        assert!(!is_suppressed());
    });
}

#[test]
fn test_inner_scope_does_not_reenable_outer() {
    on_fresh_thread(|| {
        let _outer = SuppressionScope::enter();
        {
            let _inner = SuppressionScope::enter();
        }
        assert!(
            is_suppressed(),
            "completing a nested scope must not re-enable detection"
        );
    });
}

#[test]
fn test_suppression_is_invisible_across_threads() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (done_tx, done_rx) = mpsc::channel::<()>();

    let holder = std::thread::spawn(move || {
        let _scope = SuppressionScope::enter();
        entered_tx.send(()).unwrap();
        // Hold the scope until the observer has looked.
        done_rx.recv().unwrap();
    });

    entered_rx.recv().unwrap();
    // While the holder thread is suppressed, this thread is not.
    assert!(!is_suppressed());
    done_tx.send(()).unwrap();
    holder.join().unwrap();
}

#[test]
fn test_recursion_scope_depth() {
    on_fresh_thread(|| {
        let outer = RecursionScope::enter();
        assert_eq!(outer.depth(), 1);
        assert!(!outer.is_reentrant());

        let inner = RecursionScope::enter();
        assert!(inner.is_reentrant());
        drop(inner);

        assert_eq!(recursion_depth(), 1);
    });
}

#[test]
fn test_monitor_drops_suppressed_and_reentrant_signals() {
    on_fresh_thread(|| {
        let monitor = BlockingMonitor::new();

        // A plain report goes through.
        monitor.report_blocking();

        // A report from suppressed listener work is dropped.
        monitor.run_suppressed(|| monitor.report_blocking());

        // A report from inside an active handling region is dropped.
        {
            let _region = RecursionScope::enter();
            monitor.report_blocking();
        }

        let stats = monitor.stats();
        assert_eq!(stats.emitted(), 1);
        assert_eq!(stats.suppressed(), 1);
        assert_eq!(stats.reentrant(), 1);
    });
}

#[test]
fn test_monitor_leaves_thread_clean() {
    on_fresh_thread(|| {
        let monitor = BlockingMonitor::new();
        monitor.report_blocking();
        monitor.report_blocking();

        assert!(!is_suppressed());
        assert_eq!(recursion_depth(), 0);
        assert_eq!(monitor.stats().emitted(), 2);
    });
}
