//! Region ordering strategies for heatmap rows.
//!
//! Each strategy turns a [`TimeSeriesMatrix`] into a [`RegionOrdering`], a
//! permutation of its regions. Strategies implement [`RegionOrderer`]; the
//! closed [`OrderingStrategy`] enum selects one by name.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use regional_trends::core::TimeSeriesMatrix;
//! use regional_trends::ordering::{order_regions, OrderingConfig, OrderingStrategy};
//!
//! let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
//! let days: Vec<_> = (0..4).map(|i| base + Duration::days(i)).collect();
//! let matrix = TimeSeriesMatrix::from_columns(
//!     days,
//!     vec![
//!         ("C", vec![9.0, 9.0, 9.0, 9.0]),
//!         ("A", vec![1.0, 2.0, 3.0, 4.0]),
//!         ("B", vec![1.5, 2.5, 3.5, 4.5]),
//!     ],
//! )
//! .unwrap();
//!
//! let config = OrderingConfig::new("recent-distance".parse().unwrap()).anchor("A");
//! let ordering = order_regions(&matrix, &config).unwrap();
//! assert_eq!(ordering.as_slice(), &["A", "B", "C"]);
//! assert_eq!(config.strategy, OrderingStrategy::RecentDistance);
//! ```

mod chain;
mod projection;
mod simple;
mod traits;

pub use chain::{ComparisonWindow, CorrelationChain, DistanceChain, DEFAULT_CHAIN_WINDOW};
pub use projection::{KMeansAxisProjection, PcaProjection};
pub use simple::{Alphabetical, DensityOrder, RandomOrder};
pub use traits::{BoxedOrderer, RegionOrderer, RegionOrdering};

use crate::core::{RegionTable, TimeSeriesMatrix};
use crate::error::{RegionError, Result};
use std::fmt;
use std::str::FromStr;

/// Anchor region used when none is configured.
pub const DEFAULT_ANCHOR: &str = "Lombardia";

/// The available ordering strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderingStrategy {
    /// Spearman correlation chain from the anchor.
    #[default]
    Correlation,
    /// Euclidean distance chain against the last placed regions.
    RecentDistance,
    /// Euclidean distance chain against the first placed regions.
    AnchorDistance,
    /// Score on the first principal component, highest first.
    Pca,
    /// Projection on the axis between two k-means centroids, lowest first.
    KMeansAxis,
    /// Population density, highest first.
    Density,
    /// Uniform shuffle.
    Random,
    /// Lexicographic by region label.
    Alphabetical,
}

impl OrderingStrategy {
    pub const ALL: [OrderingStrategy; 8] = [
        OrderingStrategy::Correlation,
        OrderingStrategy::RecentDistance,
        OrderingStrategy::AnchorDistance,
        OrderingStrategy::Pca,
        OrderingStrategy::KMeansAxis,
        OrderingStrategy::Density,
        OrderingStrategy::Random,
        OrderingStrategy::Alphabetical,
    ];

    /// Canonical strategy name, accepted back by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            OrderingStrategy::Correlation => "correlation",
            OrderingStrategy::RecentDistance => "recent-distance",
            OrderingStrategy::AnchorDistance => "anchor-distance",
            OrderingStrategy::Pca => "pca",
            OrderingStrategy::KMeansAxis => "kmeans-axis",
            OrderingStrategy::Density => "density",
            OrderingStrategy::Random => "random",
            OrderingStrategy::Alphabetical => "alphabetical",
        }
    }

    /// Whether the strategy starts its ordering at the anchor region.
    pub fn uses_anchor(&self) -> bool {
        matches!(
            self,
            OrderingStrategy::Correlation
                | OrderingStrategy::RecentDistance
                | OrderingStrategy::AnchorDistance
        )
    }
}

impl fmt::Display for OrderingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrderingStrategy {
    type Err = RegionError;

    /// Case-insensitive; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace('_', "-");
        OrderingStrategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.name() == key)
            .ok_or_else(|| RegionError::UnknownStrategy(s.to_string()))
    }
}

/// Everything a strategy may need, passed explicitly to [`order_regions`].
#[derive(Debug, Clone)]
pub struct OrderingConfig {
    pub strategy: OrderingStrategy,
    /// Starting region for the chain strategies.
    pub anchor: String,
    /// Per-region density for [`OrderingStrategy::Density`].
    pub density: RegionTable,
    /// Shuffle seed for [`OrderingStrategy::Random`]; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Comparison window width for the distance chains.
    pub window: usize,
    /// k-means seed for [`OrderingStrategy::KMeansAxis`].
    pub kmeans_seed: u64,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            strategy: OrderingStrategy::default(),
            anchor: DEFAULT_ANCHOR.to_string(),
            density: RegionTable::new(),
            seed: None,
            window: DEFAULT_CHAIN_WINDOW,
            kmeans_seed: 0,
        }
    }
}

impl OrderingConfig {
    pub fn new(strategy: OrderingStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn strategy(mut self, strategy: OrderingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    pub fn density(mut self, density: RegionTable) -> Self {
        self.density = density;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn kmeans_seed(mut self, seed: u64) -> Self {
        self.kmeans_seed = seed;
        self
    }

    /// Build the orderer this configuration selects.
    pub fn orderer(&self) -> BoxedOrderer {
        match self.strategy {
            OrderingStrategy::Correlation => Box::new(CorrelationChain::new(self.anchor.clone())),
            OrderingStrategy::RecentDistance => {
                Box::new(DistanceChain::recent(self.anchor.clone()).width(self.window))
            }
            OrderingStrategy::AnchorDistance => {
                Box::new(DistanceChain::leading(self.anchor.clone()).width(self.window))
            }
            OrderingStrategy::Pca => Box::new(PcaProjection),
            OrderingStrategy::KMeansAxis => {
                Box::new(KMeansAxisProjection::new().seed(self.kmeans_seed))
            }
            OrderingStrategy::Density => Box::new(DensityOrder::new(self.density.clone())),
            OrderingStrategy::Random => match self.seed {
                Some(seed) => Box::new(RandomOrder::new().seed(seed)),
                None => Box::new(RandomOrder::new()),
            },
            OrderingStrategy::Alphabetical => Box::new(Alphabetical),
        }
    }
}

/// Order the regions of `matrix` with the configured strategy.
pub fn order_regions(matrix: &TimeSeriesMatrix, config: &OrderingConfig) -> Result<RegionOrdering> {
    if matrix.n_regions() == 0 {
        return Err(RegionError::EmptyData);
    }
    let orderer = config.orderer();
    let ordering = orderer.order(matrix)?;
    log::info!(
        "ordered {} regions over {} days with {}",
        ordering.len(),
        matrix.len(),
        orderer.name()
    );
    Ok(ordering)
}
