//! Numeric utilities shared by the orderers and the clustering engine.

pub mod pca;
pub mod stats;

pub use pca::{first_component, PcaResult};
pub use stats::{dot, euclidean_pairwise, l2_norm, mean, pearson, ranks, spearman, spearman_matrix};
