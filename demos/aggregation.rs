//! Demonstrates metric pre-aggregation: messy emissions in, canonical
//! time-bucketed aggregates out.

use std::time::SystemTime;
use telemetry_guard::{AggregatorBuilder, MetricSample, MetricValue};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("telemetry_guard=debug")
        .init();

    let aggregator = AggregatorBuilder::new().build().unwrap();
    let now = SystemTime::now();

    println!("=== Metric Pre-Aggregation ===\n");
    println!("Recording 10 counter increments and 5 latency observations");
    println!("with deliberately messy identifiers...\n");

    for _ in 0..10 {
        // Name and tag get compacted, the unit gets underscored.
        aggregator.record(
            MetricSample::counter("endpoint hits!", 1.0, now)
                .with_unit("req/s")
                .with_tag("route name", "user index"),
        );
    }

    for latency in [36.0, 49.0, 57.0, 68.0, 44.0] {
        aggregator.record(
            MetricSample::distribution("endpoint.response_time", latency, now)
                .with_unit("millisecond")
                .with_tag("route", "user_index"),
        );
    }

    println!("Tracked buckets: {}\n", aggregator.len());

    for bucket in aggregator.flush_all() {
        println!("bucket {:>10}  {} ({})", bucket.bucket, bucket.name, bucket.unit);
        for (key, value) in &bucket.tags {
            println!("    tag {} = {}", key, value);
        }
        match bucket.value {
            MetricValue::Counter(sum) => println!("    counter sum = {}", sum),
            MetricValue::Distribution(values) => println!("    distribution = {:?}", values),
            MetricValue::Gauge(summary) => println!("    gauge = {:?}", summary),
            MetricValue::Set(members) => println!("    distinct members = {}", members.len()),
        }
        println!();
    }

    let snapshot = aggregator.stats().snapshot();
    println!(
        "recorded={} flushed={} dropped={}",
        snapshot.samples_recorded,
        snapshot.buckets_flushed,
        snapshot.samples_dropped_capacity + snapshot.samples_dropped_mismatch,
    );
}
