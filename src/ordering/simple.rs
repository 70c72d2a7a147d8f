//! Orderings that do not look at the trajectories.

use super::traits::{RegionOrderer, RegionOrdering};
use crate::core::{RegionTable, TimeSeriesMatrix};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Sort regions by a per-region scalar such as population density, highest first.
///
/// Trajectory values are ignored. Equal densities keep column order.
#[derive(Debug, Clone)]
pub struct DensityOrder {
    density: RegionTable,
}

impl DensityOrder {
    pub fn new(density: RegionTable) -> Self {
        Self { density }
    }

    pub fn density(&self) -> &RegionTable {
        &self.density
    }
}

impl RegionOrderer for DensityOrder {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        self.density.covers(matrix.regions())?;
        let mut keyed: Vec<(usize, f64)> = Vec::with_capacity(matrix.n_regions());
        for (i, region) in matrix.regions().iter().enumerate() {
            keyed.push((i, self.density.get(region)?));
        }
        keyed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let indices: Vec<usize> = keyed.into_iter().map(|(i, _)| i).collect();
        Ok(RegionOrdering::from_indices(&indices, matrix))
    }

    fn name(&self) -> &str {
        "density"
    }
}

/// Sort regions lexicographically by label.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alphabetical;

impl RegionOrderer for Alphabetical {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        let mut indices: Vec<usize> = (0..matrix.n_regions()).collect();
        indices.sort_by(|&a, &b| matrix.regions()[a].cmp(&matrix.regions()[b]));
        Ok(RegionOrdering::from_indices(&indices, matrix))
    }

    fn name(&self) -> &str {
        "alphabetical"
    }
}

/// Shuffle regions uniformly. Seeded shuffles are reproducible.
#[derive(Debug, Clone, Default)]
pub struct RandomOrder {
    seed: Option<u64>,
}

impl RandomOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl RegionOrderer for RandomOrder {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut indices: Vec<usize> = (0..matrix.n_regions()).collect();
        indices.shuffle(&mut rng);
        Ok(RegionOrdering::from_indices(&indices, matrix))
    }

    fn name(&self) -> &str {
        "random"
    }
}
