//! RegionOrderer trait and the ordering result type.

use crate::core::TimeSeriesMatrix;
use crate::error::Result;

/// A permutation of a matrix's regions, used as heatmap row order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionOrdering(Vec<String>);

impl RegionOrdering {
    /// Build an ordering from column indices of `matrix`.
    pub(crate) fn from_indices(indices: &[usize], matrix: &TimeSeriesMatrix) -> Self {
        Self(
            indices
                .iter()
                .map(|&i| matrix.regions()[i].clone())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|s| s.as_str())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl AsRef<[String]> for RegionOrdering {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

/// Common interface for every ordering strategy.
///
/// This trait is object-safe and can be used with `Box<dyn RegionOrderer>`.
pub trait RegionOrderer {
    /// Compute a permutation of the matrix regions.
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering>;

    /// Get the strategy name.
    fn name(&self) -> &str;
}

/// Type alias for boxed orderer trait objects.
pub type BoxedOrderer = Box<dyn RegionOrderer + Send + Sync>;
