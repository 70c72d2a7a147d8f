//! Time series clustering algorithms.
//!
//! Provides Dynamic Time Warping (DTW) distance measures, DTW barycenter
//! averaging, k-means clustering and the region trajectory clustering engine.
//!
//! # Example
//!
//! ```
//! use regional_trends::clustering::{dtw_distance, kmeans, KMeansConfig};
//!
//! // Compute DTW distance between two series
//! let a = vec![1.0, 2.0, 3.0, 2.0, 1.0];
//! let b = vec![1.0, 2.0, 3.0, 2.0, 1.0];
//! assert_eq!(dtw_distance(&a, &b), 0.0);
//!
//! // Cluster time series
//! let series = vec![
//!     vec![1.0, 2.0, 1.0],
//!     vec![1.1, 2.1, 1.1],
//!     vec![10.0, 11.0, 10.0],
//!     vec![10.1, 11.1, 10.1],
//! ];
//! let config = KMeansConfig::default().k(2).seed(42);
//! let result = kmeans(&series, &config).unwrap();
//! assert_eq!(result.centroids.len(), 2);
//! ```

pub mod barycenter;
pub mod dtw;
pub mod kmeans;
pub mod trajectory;

pub use barycenter::dtw_barycenter;

pub use dtw::{dtw_distance, dtw_distance_windowed, dtw_path, euclidean_distance};

pub use kmeans::{kmeans, DistanceMetric, KMeansConfig, KMeansResult};

pub use trajectory::{
    centroid_peaks, cluster_trajectories, ClusterAssignment, TrajectoryClusteringConfig,
    TrajectoryClusters,
};
