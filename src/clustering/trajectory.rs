//! Shape-based clustering of region trajectories.
//!
//! Regions are grouped by DTW k-means. Cluster labels are then made canonical:
//! cluster 0 is the one whose centroid has the largest sum, cluster `k - 1`
//! the smallest. Each centroid is scanned for waves with
//! [`PeakConfig::trajectory`] thresholds.

use super::kmeans::{kmeans, DistanceMetric, KMeansConfig};
use crate::core::TimeSeriesMatrix;
use crate::detection::{find_peaks, PeakConfig};
use crate::error::{RegionError, Result};

/// Configuration for [`cluster_trajectories`].
#[derive(Debug, Clone)]
pub struct TrajectoryClusteringConfig {
    /// Number of clusters
    pub k: usize,
    /// Number of k-means restarts
    pub n_init: usize,
    /// Random seed
    pub seed: Option<u64>,
    /// Maximum k-means iterations per restart
    pub max_iter: usize,
    /// Sakoe-Chiba band for DTW (None for unconstrained)
    pub window: Option<usize>,
    /// Maximum DBA passes per centroid update
    pub barycenter_iter: usize,
    /// Peak thresholds applied to centroids
    pub peaks: PeakConfig,
}

impl Default for TrajectoryClusteringConfig {
    fn default() -> Self {
        Self {
            k: 3,
            n_init: 10,
            seed: Some(42),
            max_iter: 50,
            window: None,
            barycenter_iter: 30,
            peaks: PeakConfig::trajectory(),
        }
    }
}

impl TrajectoryClusteringConfig {
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use a fresh random seed on every call.
    pub fn unseeded(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    pub fn barycenter_iter(mut self, barycenter_iter: usize) -> Self {
        self.barycenter_iter = barycenter_iter;
        self
    }

    pub fn peaks(mut self, peaks: PeakConfig) -> Self {
        self.peaks = peaks;
        self
    }

    fn kmeans_config(&self) -> KMeansConfig {
        KMeansConfig {
            k: self.k,
            max_iter: self.max_iter,
            metric: DistanceMetric::DTW,
            seed: self.seed,
            n_init: self.n_init,
            window: self.window,
            barycenter_iter: self.barycenter_iter,
            ..KMeansConfig::default()
        }
    }
}

/// Region → cluster index, in matrix column order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterAssignment {
    regions: Vec<String>,
    labels: Vec<usize>,
}

impl ClusterAssignment {
    /// Cluster index of a region.
    pub fn cluster_of(&self, region: &str) -> Option<usize> {
        self.regions
            .iter()
            .position(|r| r == region)
            .map(|i| self.labels[i])
    }

    /// Cluster labels aligned with [`ClusterAssignment::regions`].
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.regions
            .iter()
            .zip(self.labels.iter())
            .map(|(r, &l)| (r.as_str(), l))
    }
}

/// Result of [`cluster_trajectories`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrajectoryClusters {
    /// Centroid trajectories, cluster 0 first (largest sum)
    pub centroids: Vec<Vec<f64>>,
    /// Region → canonical cluster label
    pub assignment: ClusterAssignment,
    /// Member regions per cluster, in matrix column order
    pub members: Vec<Vec<String>>,
    /// Peak indices per centroid, ascending
    pub peaks: Vec<Vec<usize>>,
    /// Sum of squared DTW distances of regions to their centroid
    pub inertia: f64,
}

impl TrajectoryClusters {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Sum of a centroid's values.
    pub fn magnitude(&self, cluster: usize) -> f64 {
        self.centroids
            .get(cluster)
            .map(|c| c.iter().sum())
            .unwrap_or(f64::NAN)
    }
}

/// Peak indices of a centroid.
///
/// A zero sample is appended first so that a wave still rising or topping out
/// at the last day is detectable. The padded position itself is never reported.
pub fn centroid_peaks(centroid: &[f64], config: &PeakConfig) -> Vec<usize> {
    let mut padded = Vec::with_capacity(centroid.len() + 1);
    padded.extend_from_slice(centroid);
    padded.push(0.0);

    find_peaks(&padded, config)
        .into_iter()
        .map(|p| p.index)
        .filter(|&i| i < centroid.len())
        .collect()
}

/// Cluster the region trajectories of `matrix` by DTW shape similarity.
///
/// # Errors
/// * [`RegionError::InvalidClusterCount`] if `k` is 0 or exceeds the number of regions
/// * [`RegionError::ConvergenceFailure`] if every restart produced an empty cluster
pub fn cluster_trajectories(
    matrix: &TimeSeriesMatrix,
    config: &TrajectoryClusteringConfig,
) -> Result<TrajectoryClusters> {
    let n = matrix.n_regions();
    if config.k == 0 || config.k > n {
        return Err(RegionError::InvalidClusterCount {
            k: config.k,
            n_regions: n,
        });
    }

    log::info!(
        "clustering {} regions over {} days into {} clusters ({} restarts)",
        n,
        matrix.len(),
        config.k,
        config.n_init
    );

    let fit = kmeans(matrix.trajectories(), &config.kmeans_config())?;

    // Canonical order: descending centroid sum, raw label breaks ties.
    let sums: Vec<f64> = fit.centroids.iter().map(|c| c.iter().sum()).collect();
    let mut order: Vec<usize> = (0..fit.centroids.len()).collect();
    order.sort_by(|&a, &b| {
        sums[b]
            .partial_cmp(&sums[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut relabel = vec![0; order.len()];
    for (canonical, &raw) in order.iter().enumerate() {
        relabel[raw] = canonical;
    }

    let centroids: Vec<Vec<f64>> = order.iter().map(|&raw| fit.centroids[raw].clone()).collect();
    let labels: Vec<usize> = fit.labels.iter().map(|&raw| relabel[raw]).collect();

    let mut members = vec![Vec::new(); centroids.len()];
    for (region, &label) in matrix.regions().iter().zip(labels.iter()) {
        members[label].push(region.clone());
    }

    let peaks: Vec<Vec<usize>> = centroids
        .iter()
        .map(|c| centroid_peaks(c, &config.peaks))
        .collect();

    for (cluster, (m, p)) in members.iter().zip(peaks.iter()).enumerate() {
        log::debug!(
            "cluster {}: {} regions, magnitude {:.3}, peaks {:?}",
            cluster,
            m.len(),
            sums[order[cluster]],
            p
        );
    }

    Ok(TrajectoryClusters {
        centroids,
        assignment: ClusterAssignment {
            regions: matrix.regions().to_vec(),
            labels,
        },
        members,
        peaks,
        inertia: fit.inertia,
    })
}
