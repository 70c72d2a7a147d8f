//! # regional-trends
//!
//! Ordering and shape clustering of regional daily case trajectories.
//!
//! Provides eight region ordering strategies for heatmap rows (correlation
//! and distance chains, PCA and k-means projections, density, random and
//! alphabetical), DTW k-means clustering of trajectories with canonical
//! magnitude ordering and wave peak detection, and the preparation pipeline
//! that turns raw counts into log-scaled, population-normalised series.

// `DistanceMetric::DTW`
#![allow(clippy::upper_case_acronyms)]
// Symmetric matrix fills and the DTW cost table index by (i, j).
#![allow(clippy::needless_range_loop)]

pub mod clustering;
pub mod core;
pub mod detection;
pub mod error;
pub mod ordering;
pub mod report;
pub mod transform;
pub mod utils;

pub use error::{RegionError, Result};

pub mod prelude {
    pub use crate::clustering::{
        cluster_trajectories, ClusterAssignment, TrajectoryClusteringConfig, TrajectoryClusters,
    };
    pub use crate::core::{RegionTable, TimeSeriesMatrix};
    pub use crate::error::{RegionError, Result};
    pub use crate::ordering::{
        order_regions, OrderingConfig, OrderingStrategy, RegionOrderer, RegionOrdering,
    };
    pub use crate::report::{ClusterSeries, HeatmapFrame};
    pub use crate::transform::{prepare, PreparationConfig};
}
