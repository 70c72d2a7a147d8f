//! One-dimensional projections of region trajectories.

use super::traits::{RegionOrderer, RegionOrdering};
use crate::clustering::{kmeans, KMeansConfig};
use crate::core::TimeSeriesMatrix;
use crate::error::{RegionError, Result};
use crate::utils::{dot, first_component};

const AXIS_EPSILON: f64 = 1e-12;

/// Column indices sorted by score; stable, so equal scores keep column order.
fn sort_by_score(scores: &[f64], descending: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        let ord = scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    indices
}

fn require_two(matrix: &TimeSeriesMatrix) -> Result<()> {
    if matrix.n_regions() < 2 {
        return Err(RegionError::InsufficientSamples {
            needed: 2,
            got: matrix.n_regions(),
        });
    }
    Ok(())
}

/// Sort regions by their score on the leading principal component, highest first.
///
/// Regions are samples and days are features. The component's sign follows
/// [`crate::utils::pca`]: its largest-magnitude loading is positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcaProjection;

impl PcaProjection {
    /// Per-region scores, in column order.
    pub fn scores(&self, matrix: &TimeSeriesMatrix) -> Result<Vec<f64>> {
        require_two(matrix)?;
        let pca = first_component(matrix.trajectories())?;
        log::debug!("pca: explained variance {:.4}", pca.explained_variance);
        Ok(pca.scores)
    }
}

impl RegionOrderer for PcaProjection {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        let scores = self.scores(matrix)?;
        Ok(RegionOrdering::from_indices(
            &sort_by_score(&scores, true),
            matrix,
        ))
    }

    fn name(&self) -> &str {
        "pca"
    }
}

/// Sort regions along the axis joining two k-means centroids, lowest first.
///
/// Each region's scalar is `(x - c0) · (c1 - c0) / |c1 - c0|²`, so members of
/// cluster 0 sit near 0 and members of cluster 1 near 1.
#[derive(Debug, Clone)]
pub struct KMeansAxisProjection {
    seed: u64,
    n_init: usize,
}

impl Default for KMeansAxisProjection {
    fn default() -> Self {
        Self { seed: 0, n_init: 10 }
    }
}

impl KMeansAxisProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Per-region scalar projections, in column order.
    pub fn projections(&self, matrix: &TimeSeriesMatrix) -> Result<Vec<f64>> {
        require_two(matrix)?;

        // Fewer than two distinct trajectories cannot span an axis.
        let first = &matrix.trajectories()[0];
        if matrix.trajectories().iter().all(|x| x == first) {
            return Err(RegionError::DegenerateAxis);
        }

        let config = KMeansConfig::default()
            .k(2)
            .seed(self.seed)
            .n_init(self.n_init);
        let fit = kmeans(matrix.trajectories(), &config)?;
        let origin = &fit.centroids[0];

        let axis: Vec<f64> = fit.centroids[1]
            .iter()
            .zip(origin.iter())
            .map(|(b, a)| b - a)
            .collect();
        let norm2 = dot(&axis, &axis);
        if norm2 < AXIS_EPSILON {
            return Err(RegionError::DegenerateAxis);
        }

        Ok(matrix
            .trajectories()
            .iter()
            .map(|x| {
                let centered: Vec<f64> = x.iter().zip(origin.iter()).map(|(v, o)| v - o).collect();
                dot(&centered, &axis) / norm2
            })
            .collect())
    }
}

impl RegionOrderer for KMeansAxisProjection {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        let projections = self.projections(matrix)?;
        Ok(RegionOrdering::from_indices(
            &sort_by_score(&projections, false),
            matrix,
        ))
    }

    fn name(&self) -> &str {
        "kmeans-axis"
    }
}
