//! Chunk planning benchmarks.
//!
//! Run with: `cargo bench --package quarry-bench`

use chrono::TimeDelta;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quarry_bench::Workload;
use quarry_estimate::{ChunkPlanner, DEFAULT_CHUNK_SIZE_BYTES, PayloadEstimator};
use std::hint::black_box;

fn workloads() -> Vec<(&'static str, Workload)> {
    vec![
        (
            "100-stations-1-day",
            Workload {
                stations: 100,
                channels_per_station: 3,
                intervals_per_channel: 1,
                interval: TimeDelta::days(1),
            },
        ),
        (
            "1000-stations-hourly",
            Workload {
                stations: 1000,
                channels_per_station: 6,
                intervals_per_channel: 24,
                interval: TimeDelta::hours(1),
            },
        ),
    ]
}

fn estimate_benchmark(c: &mut Criterion) {
    let estimator = PayloadEstimator::new();
    let mut group = c.benchmark_group("estimate");

    for (name, workload) in workloads() {
        group.throughput(Throughput::Elements(workload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &workload, |b, w| {
            b.iter(|| black_box(w.estimated(&estimator)));
        });
    }
    group.finish();
}

fn plan_benchmark(c: &mut Criterion) {
    let estimator = PayloadEstimator::new();
    let mut group = c.benchmark_group("plan");

    for (name, workload) in workloads() {
        let items = workload.estimated(&estimator);
        group.throughput(Throughput::Elements(items.len() as u64));

        for threshold in [1024 * 1024, DEFAULT_CHUNK_SIZE_BYTES] {
            let planner = ChunkPlanner::new(threshold);
            group.bench_with_input(
                BenchmarkId::new(name, threshold),
                &items,
                |b, items| {
                    b.iter(|| black_box(planner.plan(items.iter().cloned())));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, estimate_benchmark, plan_benchmark);
criterion_main!(benches);
