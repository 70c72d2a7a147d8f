//! End-to-end scenarios on small hand-built region sets.

use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use regional_trends::clustering::{centroid_peaks, cluster_trajectories, TrajectoryClusteringConfig};
use regional_trends::core::{RegionTable, TimeSeriesMatrix};
use regional_trends::detection::{find_peaks, PeakConfig};
use regional_trends::ordering::{order_regions, OrderingConfig, OrderingStrategy};
use regional_trends::report::HeatmapFrame;
use regional_trends::transform::{latest_extremes, prepare, with_complement, PreparationConfig};

fn days(n: usize) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
    (0..n).map(|i| base + Duration::days(i as i64)).collect()
}

fn chain_strategies() -> Vec<OrderingStrategy> {
    OrderingStrategy::ALL
        .iter()
        .copied()
        .filter(|s| s.uses_anchor())
        .collect()
}

// =============================================================================
// Chains on three regions
// =============================================================================

#[test]
fn close_region_follows_anchor() {
    // B tracks A closely in value and rank; C falls while A rises.
    let a: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let b: Vec<f64> = a.iter().map(|v| v + 0.5).collect();
    let c: Vec<f64> = a.iter().map(|v| 20.0 - v).collect();
    let matrix = TimeSeriesMatrix::from_columns(days(10), vec![("C", c), ("A", a), ("B", b)]).unwrap();

    for strategy in chain_strategies() {
        let ordering = order_regions(&matrix, &OrderingConfig::new(strategy).anchor("A")).unwrap();
        assert_eq!(ordering.as_slice(), &["A", "B", "C"], "strategy {}", strategy);
    }
}

#[test]
fn single_region_is_a_singleton() {
    let matrix =
        TimeSeriesMatrix::from_columns(days(10), vec![("Lombardia", vec![1.0; 10])]).unwrap();

    for strategy in chain_strategies() {
        let ordering = order_regions(&matrix, &OrderingConfig::new(strategy)).unwrap();
        assert_eq!(ordering.as_slice(), &["Lombardia"]);
    }
}

// =============================================================================
// Peaks
// =============================================================================

#[test]
fn single_bump_gives_single_peak() {
    let n = 60;
    let sigma = 10.0 / 2.355;
    let series: Vec<f64> = (0..n)
        .map(|i| {
            let d = i as f64 - 30.0;
            if d.abs() > 15.0 {
                0.0
            } else {
                5.0 * (-d * d / (2.0 * sigma * sigma)).exp()
            }
        })
        .collect();

    let peaks = find_peaks(&series, &PeakConfig::trajectory());
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 30);
    assert_relative_eq!(peaks[0].prominence, 5.0, epsilon = 1e-9);
    assert!((peaks[0].width - 10.0).abs() < 0.5, "width {}", peaks[0].width);

    assert_eq!(centroid_peaks(&series, &PeakConfig::trajectory()), vec![30]);
}

// =============================================================================
// Raw counts to heatmap and cluster plots
// =============================================================================

fn raw_counts() -> (TimeSeriesMatrix, RegionTable) {
    let n = 60;
    let wave = |center: f64, height: f64| -> Vec<f64> {
        (0..n)
            .map(|i| {
                let d = i as f64 - center;
                (1.0 + height * (-d * d / 128.0).exp()).round()
            })
            .collect()
    };
    let mut molise = wave(40.0, 30.0);
    molise[5] = 0.0; // missing report, back-filled
    let matrix = TimeSeriesMatrix::from_columns(
        days(n),
        vec![
            ("Lombardia", wave(20.0, 4000.0)),
            ("Veneto", wave(22.0, 2000.0)),
            ("Lazio", wave(38.0, 1200.0)),
            ("Molise", molise),
        ],
    )
    .unwrap();
    let population = RegionTable::new()
        .with("Lombardia", 10_060_574.0)
        .with("Veneto", 4_905_854.0)
        .with("Lazio", 5_879_082.0)
        .with("Molise", 305_617.0)
        .with("Italia", 21_151_127.0);
    (matrix, population)
}

#[test]
fn prepared_counts_feed_heatmap() {
    let (raw, population) = raw_counts();
    let prepared = prepare(&raw, &population, &PreparationConfig::default()).unwrap();

    assert_eq!(prepared.len(), 54);
    assert!(!prepared.has_missing_values());

    let config = OrderingConfig::new(OrderingStrategy::RecentDistance);
    let ordering = order_regions(&prepared, &config).unwrap();
    assert_eq!(ordering.first(), Some("Lombardia"));

    let frame = HeatmapFrame::from_ordering(&prepared, ordering.as_slice()).unwrap();
    assert_eq!(frame.n_rows(), 4);
    assert_eq!(frame.n_days(), 54);
    assert_eq!(frame.regions, ordering.into_vec());

    let (_, highest) = latest_extremes(&prepared).unwrap();
    assert_ne!(highest, "Lombardia");
}

#[test]
fn prepared_counts_feed_cluster_plots() {
    let (raw, population) = raw_counts();
    let prepared = prepare(&raw, &population, &PreparationConfig::default()).unwrap();

    let clusters =
        cluster_trajectories(&prepared, &TrajectoryClusteringConfig::default().k(2)).unwrap();
    let series = clusters.series(&prepared).unwrap();

    assert_eq!(series.len(), 2);
    assert!(clusters.magnitude(0) >= clusters.magnitude(1));
    let members: usize = series.iter().map(|s| s.members.len()).sum();
    assert_eq!(members, 4);
    for s in &series {
        assert_eq!(s.centroid.len(), prepared.len());
        assert!(s.peaks.iter().all(|t| prepared.timestamps().contains(t)));
    }
}

#[test]
fn region_against_rest_of_country() {
    let (raw, population) = raw_counts();
    let (paired, table) = with_complement(&raw, "Lazio", &population).unwrap();
    let config = PreparationConfig::default()
        .benchmark("Lazio")
        .log_base(std::f64::consts::E);
    let prepared = prepare(&paired, &table, &config).unwrap();

    assert_eq!(prepared.regions(), &["Lazio", "Italia_no_Lazio"]);
    assert!(!prepared.has_missing_values());
}
