//! Detection utilities for region trajectories.
//!
//! This module provides peak detection with prominence, spacing and width
//! thresholds, used to mark waves on cluster centroids.

mod peaks;

pub use peaks::{find_peaks, local_maxima, Peak, PeakConfig};
