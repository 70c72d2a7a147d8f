//! K-means clustering for time series.
//!
//! Provides k-means with Euclidean or DTW distance, k-means++ seeding and
//! independent restarts evaluated in parallel. Euclidean centroids are
//! element-wise means; DTW centroids are refined by DTW barycenter averaging.

use super::barycenter::dtw_barycenter;
use super::dtw::{dtw_distance, dtw_distance_windowed, euclidean_distance};
use crate::error::{RegionError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

/// Distance metric for clustering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceMetric {
    /// Euclidean distance (requires same-length series)
    #[default]
    Euclidean,
    /// Dynamic Time Warping distance
    DTW,
}

/// K-means configuration.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Maximum iterations per restart
    pub max_iter: usize,
    /// Distance metric
    pub metric: DistanceMetric,
    /// Random seed; restart `r` uses `seed + r`
    pub seed: Option<u64>,
    /// Convergence tolerance on inertia
    pub tolerance: f64,
    /// Number of independent restarts
    pub n_init: usize,
    /// Sakoe-Chiba band for DTW (None for unconstrained)
    pub window: Option<usize>,
    /// Maximum DBA passes per centroid update
    pub barycenter_iter: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iter: 50,
            metric: DistanceMetric::Euclidean,
            seed: None,
            tolerance: 1e-6,
            n_init: 10,
            window: None,
            barycenter_iter: 30,
        }
    }
}

impl KMeansConfig {
    /// Set number of clusters.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set maximum iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set number of restarts.
    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Constrain DTW warping to a band of `window` samples.
    pub fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    /// Set maximum DBA passes per centroid update.
    pub fn barycenter_iter(mut self, barycenter_iter: usize) -> Self {
        self.barycenter_iter = barycenter_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// K-means clustering result.
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster assignments for each series (0-indexed)
    pub labels: Vec<usize>,
    /// Cluster centroids
    pub centroids: Vec<Vec<f64>>,
    /// Inertia (sum of squared distances to the assigned centroid)
    pub inertia: f64,
    /// Number of iterations performed by the retained restart
    pub n_iter: usize,
    /// Index of the retained restart
    pub restart: usize,
}

/// Why a single restart was abandoned.
#[derive(Debug, Clone, Error)]
enum RestartFailure {
    #[error("cluster {0} became empty")]
    EmptyCluster(usize),
    #[error("seeding found only {found} distinct centroids for k = {k}")]
    DegenerateSeeding { found: usize, k: usize },
}

/// Perform k-means clustering on time series.
///
/// Runs `config.n_init` independent restarts and keeps the one with the
/// lowest inertia (lowest restart index on ties). A restart that produces an
/// empty cluster is abandoned; if all restarts are abandoned the call fails
/// with [`RegionError::ConvergenceFailure`].
///
/// # Arguments
/// * `series` - Same-length time series, one per sample
/// * `config` - K-means configuration
pub fn kmeans(series: &[Vec<f64>], config: &KMeansConfig) -> Result<KMeansResult> {
    let n = series.len();
    if n == 0 {
        return Err(RegionError::EmptyData);
    }
    if config.k == 0 || config.k > n {
        return Err(RegionError::InvalidClusterCount {
            k: config.k,
            n_regions: n,
        });
    }
    let len = series[0].len();
    if let Some(bad) = series.iter().find(|s| s.len() != len) {
        return Err(RegionError::DimensionMismatch {
            expected: len,
            got: bad.len(),
        });
    }
    if config.n_init == 0 {
        return Err(RegionError::InvalidParameter(
            "n_init must be at least 1".to_string(),
        ));
    }

    let base_seed = config.seed.unwrap_or_else(rand::random);

    let runs: Vec<std::result::Result<KMeansResult, RestartFailure>> = (0..config.n_init)
        .into_par_iter()
        .map(|restart| single_run(series, config, base_seed.wrapping_add(restart as u64), restart))
        .collect();

    let mut best: Option<KMeansResult> = None;
    let mut last_failure = None;
    for (restart, run) in runs.into_iter().enumerate() {
        match run {
            Ok(result) => {
                log::debug!(
                    "kmeans restart {} finished after {} iterations, inertia {:.6}",
                    restart,
                    result.n_iter,
                    result.inertia
                );
                if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
                    best = Some(result);
                }
            }
            Err(failure) => {
                log::warn!("kmeans restart {} abandoned: {}", restart, failure);
                last_failure = Some(failure);
            }
        }
    }

    best.ok_or_else(|| RegionError::ConvergenceFailure {
        restarts: config.n_init,
        reason: last_failure
            .map(|f| f.to_string())
            .unwrap_or_else(|| "no restart completed".to_string()),
    })
}

/// One seeded k-means run.
fn single_run(
    series: &[Vec<f64>],
    config: &KMeansConfig,
    seed: u64,
    restart: usize,
) -> std::result::Result<KMeansResult, RestartFailure> {
    let k = config.k;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = initialize_centroids(series, k, config, &mut rng)?;

    let mut labels = vec![usize::MAX; series.len()];
    let mut prev_inertia = f64::INFINITY;
    let mut n_iter = 0;

    for iter in 0..config.max_iter {
        n_iter = iter + 1;

        let (new_labels, inertia) = assign(series, &centroids, config);
        check_non_empty(&new_labels, k)?;

        let changed = new_labels != labels;
        labels = new_labels;
        if !changed || (prev_inertia - inertia).abs() < config.tolerance {
            break;
        }
        prev_inertia = inertia;

        centroids = update_centroids(series, &labels, &centroids, config);
    }

    let (labels, inertia) = assign(series, &centroids, config);
    check_non_empty(&labels, k)?;

    Ok(KMeansResult {
        labels,
        centroids,
        inertia,
        n_iter,
        restart,
    })
}

fn check_non_empty(labels: &[usize], k: usize) -> std::result::Result<(), RestartFailure> {
    let mut sizes = vec![0usize; k];
    for &l in labels {
        sizes[l] += 1;
    }
    match sizes.iter().position(|&s| s == 0) {
        Some(empty) => Err(RestartFailure::EmptyCluster(empty)),
        None => Ok(()),
    }
}

/// Initialize centroids using the k-means++ algorithm.
fn initialize_centroids(
    series: &[Vec<f64>],
    k: usize,
    config: &KMeansConfig,
    rng: &mut StdRng,
) -> std::result::Result<Vec<Vec<f64>>, RestartFailure> {
    let n = series.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(series[rng.gen_range(0..n)].clone());

    let mut nearest: Vec<f64> = series
        .iter()
        .map(|s| compute_distance(s, &centroids[0], config).powi(2))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(RestartFailure::DegenerateSeeding {
                found: centroids.len(),
                k,
            });
        }

        // Select next centroid with probability proportional to squared distance
        let threshold = rng.gen::<f64>() * total;
        let mut cumsum = 0.0;
        let mut selected = None;
        for (i, &d) in nearest.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            cumsum += d;
            selected = Some(i);
            if cumsum > threshold {
                break;
            }
        }
        let Some(selected) = selected else {
            return Err(RestartFailure::DegenerateSeeding {
                found: centroids.len(),
                k,
            });
        };

        let centroid = series[selected].clone();
        for (d, s) in nearest.iter_mut().zip(series.iter()) {
            *d = d.min(compute_distance(s, &centroid, config).powi(2));
        }
        centroids.push(centroid);
    }

    Ok(centroids)
}

/// Assign each series to its nearest centroid (lowest index on ties).
fn assign(series: &[Vec<f64>], centroids: &[Vec<f64>], config: &KMeansConfig) -> (Vec<usize>, f64) {
    let mut inertia = 0.0;
    let labels = series
        .iter()
        .map(|s| {
            let (nearest, dist) = find_nearest_centroid(s, centroids, config);
            inertia += dist * dist;
            nearest
        })
        .collect();
    (labels, inertia)
}

/// Find the nearest centroid for a series.
fn find_nearest_centroid(series: &[f64], centroids: &[Vec<f64>], config: &KMeansConfig) -> (usize, f64) {
    let mut min_dist = f64::INFINITY;
    let mut nearest = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = compute_distance(series, centroid, config);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }

    (nearest, min_dist)
}

/// Compute distance between two series.
fn compute_distance(a: &[f64], b: &[f64], config: &KMeansConfig) -> f64 {
    match (config.metric, config.window) {
        (DistanceMetric::Euclidean, _) => euclidean_distance(a, b),
        (DistanceMetric::DTW, None) => dtw_distance(a, b),
        (DistanceMetric::DTW, Some(w)) => dtw_distance_windowed(a, b, w),
    }
}

/// Update centroids based on cluster assignments.
fn update_centroids(
    series: &[Vec<f64>],
    labels: &[usize],
    previous: &[Vec<f64>],
    config: &KMeansConfig,
) -> Vec<Vec<f64>> {
    previous
        .iter()
        .enumerate()
        .map(|(cluster, prev)| {
            let members: Vec<&[f64]> = series
                .iter()
                .zip(labels.iter())
                .filter(|(_, &l)| l == cluster)
                .map(|(s, _)| s.as_slice())
                .collect();

            if members.is_empty() {
                return prev.clone();
            }
            match config.metric {
                DistanceMetric::Euclidean => compute_mean_series(&members),
                DistanceMetric::DTW => dtw_barycenter(
                    &members,
                    prev,
                    config.barycenter_iter,
                    config.window,
                    config.tolerance,
                ),
            }
        })
        .collect()
}

/// Compute element-wise mean of multiple series.
fn compute_mean_series(series: &[&[f64]]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }

    let n = series.len();
    let len = series[0].len();

    (0..len)
        .map(|i| series.iter().map(|s| s[i]).sum::<f64>() / n as f64)
        .collect()
}
