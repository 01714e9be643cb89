//! Demonstrates the blocking-call monitor and its suppression guards.

use telemetry_guard::BlockingMonitor;

fn main() {
    tracing_subscriber::fmt().init();

    let monitor = BlockingMonitor::new();

    println!("=== Blocking-Call Monitor ===\n");

    println!("1. A genuine blocking signal is emitted as a tracing warning:");
    monitor.report_blocking();

    println!("\n2. Signals raised by the listener's own work are dropped:");
    monitor.run_suppressed(|| {
        // Imagine this closure captures a stack trace and blocks briefly
        // while doing so; the hook fires, but the signal goes nowhere.
        monitor.report_blocking();
    });

    println!("\n3. Suppression is per-thread; another thread still reports:");
    {
        let monitor = monitor.clone();
        std::thread::Builder::new()
            .name("worker-1".into())
            .spawn(move || monitor.report_blocking())
            .unwrap()
            .join()
            .unwrap();
    }

    let stats = monitor.stats();
    println!(
        "\nemitted={} suppressed={} reentrant={}",
        stats.emitted(),
        stats.suppressed(),
        stats.reentrant(),
    );
}
