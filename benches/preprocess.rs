use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::time::{Duration, UNIX_EPOCH};
use telemetry_guard::{
    sanitize_unit, sanitize_value, time_bucket_key, AggregatorBuilder, MetricSample,
};

/// Benchmark identifier sanitization on clean and dirty inputs
fn bench_sanitization(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitization");

    group.bench_function("value_clean", |b| {
        b.iter(|| sanitize_value(black_box("endpoint.response_time")))
    });

    group.bench_function("value_dirty", |b| {
        b.iter(|| sanitize_value(black_box("endpoint response time (p95, ms)")))
    });

    group.bench_function("unit_clean", |b| {
        b.iter(|| sanitize_unit(black_box("millisecond")))
    });

    group.bench_function("unit_dirty", |b| {
        b.iter(|| sanitize_unit(black_box("req/s per host")))
    });

    group.finish();
}

/// Benchmark bucket key computation
fn bench_bucket_keys(c: &mut Criterion) {
    let timestamp = UNIX_EPOCH + Duration::from_secs(1_722_000_123);

    c.bench_function("time_bucket_key", |b| {
        b.iter(|| time_bucket_key(black_box(timestamp)))
    });
}

/// Benchmark the full record path (canonicalize + merge)
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    group.throughput(Throughput::Elements(1));

    let aggregator = AggregatorBuilder::new().build().unwrap();
    let timestamp = UNIX_EPOCH + Duration::from_secs(1_722_000_123);

    group.bench_function("counter_clean_identifiers", |b| {
        b.iter(|| {
            aggregator.record(MetricSample::counter(
                black_box("endpoint.hits"),
                1.0,
                timestamp,
            ))
        })
    });

    group.bench_function("distribution_with_tags", |b| {
        b.iter(|| {
            aggregator.record(
                MetricSample::distribution(black_box("endpoint.response_time"), 57.0, timestamp)
                    .with_unit("millisecond")
                    .with_tag("route", "user_index"),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sanitization, bench_bucket_keys, bench_record);
criterion_main!(benches);
