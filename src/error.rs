//! Error types for the regional-trends library.

use thiserror::Error;

/// Result type alias for ordering and clustering operations.
pub type Result<T> = std::result::Result<T, RegionError>;

/// Errors that can occur while ordering or clustering regions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// The anchor region is not a column of the matrix.
    #[error("anchor region '{0}' is not present in the matrix")]
    MissingAnchor(String),

    /// A region has no entry in a lookup table or matrix.
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    /// A region label appears more than once.
    #[error("duplicate region: {0}")]
    DuplicateRegion(String),

    /// Not enough regions for the decomposition.
    #[error("insufficient samples: need at least {needed}, got {got}")]
    InsufficientSamples { needed: usize, got: usize },

    /// The two k-means centroids coincide, so there is no projection axis.
    #[error("degenerate projection axis: centroids coincide")]
    DegenerateAxis,

    /// Cluster count outside `1..=n_regions`.
    #[error("invalid cluster count: k = {k} with {n_regions} regions")]
    InvalidClusterCount { k: usize, n_regions: usize },

    /// Every k-means restart failed.
    #[error("clustering failed to converge after {restarts} restarts: {reason}")]
    ConvergenceFailure { restarts: usize, reason: String },

    /// The ordering strategy name is not registered.
    #[error("unknown ordering strategy: {0}")]
    UnknownStrategy(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),
}
