//! Plain values handed to a renderer.
//!
//! Nothing here draws; these types carry exactly what a heatmap or a line
//! plot needs, already arranged in display order.

use crate::clustering::TrajectoryClusters;
use crate::core::TimeSeriesMatrix;
use crate::error::{RegionError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Heatmap data: one row per region in display order, one column per day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatmapFrame {
    pub regions: Vec<String>,
    pub timestamps: Vec<DateTime<Utc>>,
    /// `values[row][day]`
    pub values: Vec<Vec<f64>>,
}

impl HeatmapFrame {
    /// Arrange `matrix` rows in `ordering`.
    ///
    /// # Errors
    /// * [`RegionError::UnknownRegion`] if a name is not a matrix column
    /// * [`RegionError::DimensionMismatch`] if `ordering` is not a permutation
    ///   of the matrix columns
    pub fn from_ordering<S: AsRef<str>>(matrix: &TimeSeriesMatrix, ordering: &[S]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(ordering.len());
        let mut values = Vec::with_capacity(ordering.len());
        for region in ordering {
            let region = region.as_ref();
            values.push(matrix.column(region)?.to_vec());
            seen.insert(region);
        }
        if ordering.len() != matrix.n_regions() || seen.len() != ordering.len() {
            return Err(RegionError::DimensionMismatch {
                expected: matrix.n_regions(),
                got: seen.len(),
            });
        }

        Ok(Self {
            regions: ordering.iter().map(|r| r.as_ref().to_string()).collect(),
            timestamps: matrix.timestamps().to_vec(),
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.regions.len()
    }

    pub fn n_days(&self) -> usize {
        self.timestamps.len()
    }

    /// Smallest and largest finite value, for the colour scale.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// One cluster ready for a line plot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterSeries {
    /// Canonical cluster index, 0 for the largest magnitude
    pub label: usize,
    pub centroid: Vec<f64>,
    /// Days on which the centroid peaks
    pub peaks: Vec<DateTime<Utc>>,
    /// Legend entries
    pub members: Vec<String>,
}

impl TrajectoryClusters {
    /// Pair every centroid with the matrix time axis.
    ///
    /// `matrix` must be the one the clusters were computed from; a
    /// different length fails with [`RegionError::DimensionMismatch`].
    pub fn series(&self, matrix: &TimeSeriesMatrix) -> Result<Vec<ClusterSeries>> {
        let timestamps = matrix.timestamps();
        self.centroids
            .iter()
            .zip(self.peaks.iter())
            .zip(self.members.iter())
            .enumerate()
            .map(|(label, ((centroid, peaks), members))| {
                if centroid.len() != timestamps.len() {
                    return Err(RegionError::DimensionMismatch {
                        expected: timestamps.len(),
                        got: centroid.len(),
                    });
                }
                Ok(ClusterSeries {
                    label,
                    centroid: centroid.clone(),
                    peaks: peaks.iter().map(|&i| timestamps[i]).collect(),
                    members: members.clone(),
                })
            })
            .collect()
    }
}
