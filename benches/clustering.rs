//! Benchmarks for DTW distances and trajectory clustering.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regional_trends::clustering::{
    cluster_trajectories, dtw_distance, dtw_distance_windowed, TrajectoryClusteringConfig,
};
use regional_trends::core::TimeSeriesMatrix;

fn generate_wave(n: usize, center: f64, height: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let d = i as f64 - center;
            height * (-d * d / 200.0).exp()
        })
        .collect()
}

fn generate_regions(n_regions: usize, n_days: usize) -> TimeSeriesMatrix {
    let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..n_days).map(|i| base + Duration::days(i as i64)).collect();
    let columns: Vec<(String, Vec<f64>)> = (0..n_regions)
        .map(|r| {
            let center = n_days as f64 * (0.3 + 0.4 * (r % 3) as f64 / 2.0);
            let height = 2.0 + (r % 5) as f64;
            (format!("region-{}", r), generate_wave(n_days, center, height))
        })
        .collect();
    TimeSeriesMatrix::from_columns(timestamps, columns).unwrap()
}

fn bench_dtw(c: &mut Criterion) {
    let mut group = c.benchmark_group("dtw");

    for size in [50, 100, 200, 400].iter() {
        let a = generate_wave(*size, *size as f64 * 0.4, 5.0);
        let b = generate_wave(*size, *size as f64 * 0.6, 4.0);

        group.bench_with_input(BenchmarkId::new("full", size), size, |bench, _| {
            bench.iter(|| dtw_distance(black_box(&a), black_box(&b)))
        });

        group.bench_with_input(BenchmarkId::new("band_10", size), size, |bench, _| {
            bench.iter(|| dtw_distance_windowed(black_box(&a), black_box(&b), 10))
        });
    }

    group.finish();
}

fn bench_trajectory_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("trajectory_clustering");
    group.sample_size(10);

    for days in [60, 120].iter() {
        let matrix = generate_regions(21, *days);

        group.bench_with_input(BenchmarkId::new("k3_unconstrained", days), days, |b, _| {
            let config = TrajectoryClusteringConfig::default();
            b.iter(|| cluster_trajectories(black_box(&matrix), &config))
        });

        group.bench_with_input(BenchmarkId::new("k3_band_14", days), days, |b, _| {
            let config = TrajectoryClusteringConfig::default().window(14);
            b.iter(|| cluster_trajectories(black_box(&matrix), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dtw, bench_trajectory_clustering);
criterion_main!(benches);
