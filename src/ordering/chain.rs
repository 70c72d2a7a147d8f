//! Greedy nearest-neighbour chains.
//!
//! Every chain starts at an anchor region and repeatedly appends the
//! remaining region that best matches what has already been placed. Ties are
//! resolved in favour of the lowest column index.

use super::traits::{RegionOrderer, RegionOrdering};
use crate::core::TimeSeriesMatrix;
use crate::error::{RegionError, Result};
use crate::utils::{euclidean_pairwise, l2_norm, spearman_matrix};

/// Default number of placed regions a candidate is compared with.
pub const DEFAULT_CHAIN_WINDOW: usize = 5;

fn anchor_index(matrix: &TimeSeriesMatrix, anchor: &str) -> Result<usize> {
    matrix
        .position(anchor)
        .ok_or_else(|| RegionError::MissingAnchor(anchor.to_string()))
}

/// Chain regions by Spearman correlation with the most recently placed region.
#[derive(Debug, Clone)]
pub struct CorrelationChain {
    anchor: String,
}

impl CorrelationChain {
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
        }
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }
}

impl RegionOrderer for CorrelationChain {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        let start = anchor_index(matrix, &self.anchor)?;
        let n = matrix.n_regions();
        if n == 1 {
            return Ok(RegionOrdering::from_indices(&[start], matrix));
        }

        let corr = spearman_matrix(matrix.trajectories());

        let mut remaining: Vec<usize> = (0..n).filter(|&i| i != start).collect();
        let mut placed = Vec::with_capacity(n);
        placed.push(start);

        while !remaining.is_empty() {
            let last = placed[placed.len() - 1];
            // NaN (constant series) never beats a defined correlation.
            let mut best = 0;
            let mut best_corr = f64::NEG_INFINITY;
            for (pos, &candidate) in remaining.iter().enumerate() {
                let c = corr[last][candidate];
                let c = if c.is_nan() { f64::NEG_INFINITY } else { c };
                if c > best_corr {
                    best = pos;
                    best_corr = c;
                }
            }
            let next = remaining.remove(best);
            log::trace!(
                "correlation chain: {} -> {} (rho = {:.4})",
                matrix.regions()[last],
                matrix.regions()[next],
                best_corr
            );
            placed.push(next);
        }

        Ok(RegionOrdering::from_indices(&placed, matrix))
    }

    fn name(&self) -> &str {
        "correlation"
    }
}

/// Which placed regions a candidate is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonWindow {
    /// The last `n` placed regions.
    Recent(usize),
    /// The first `n` placed regions, fixed once placed.
    Leading(usize),
}

impl ComparisonWindow {
    fn width(&self) -> usize {
        match *self {
            ComparisonWindow::Recent(w) | ComparisonWindow::Leading(w) => w,
        }
    }

    fn select<'a>(&self, placed: &'a [usize]) -> &'a [usize] {
        match *self {
            ComparisonWindow::Recent(w) => &placed[placed.len().saturating_sub(w)..],
            ComparisonWindow::Leading(w) => &placed[..w.min(placed.len())],
        }
    }
}

/// Chain regions by Euclidean distance to a window of placed regions.
///
/// A candidate's score is the L2 norm of its distances to every region in the
/// comparison window; the lowest score is placed next.
#[derive(Debug, Clone)]
pub struct DistanceChain {
    anchor: String,
    window: ComparisonWindow,
}

impl DistanceChain {
    /// Compare candidates with the last five placed regions.
    pub fn recent(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            window: ComparisonWindow::Recent(DEFAULT_CHAIN_WINDOW),
        }
    }

    /// Compare candidates with the first five placed regions.
    pub fn leading(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            window: ComparisonWindow::Leading(DEFAULT_CHAIN_WINDOW),
        }
    }

    /// Set the comparison window width, keeping its kind.
    pub fn width(mut self, width: usize) -> Self {
        self.window = match self.window {
            ComparisonWindow::Recent(_) => ComparisonWindow::Recent(width),
            ComparisonWindow::Leading(_) => ComparisonWindow::Leading(width),
        };
        self
    }

    pub fn window(&self) -> ComparisonWindow {
        self.window
    }
}

impl RegionOrderer for DistanceChain {
    fn order(&self, matrix: &TimeSeriesMatrix) -> Result<RegionOrdering> {
        if self.window.width() == 0 {
            return Err(RegionError::InvalidParameter(
                "comparison window must hold at least one region".to_string(),
            ));
        }
        let start = anchor_index(matrix, &self.anchor)?;
        let n = matrix.n_regions();
        if n == 1 {
            return Ok(RegionOrdering::from_indices(&[start], matrix));
        }

        let dist = euclidean_pairwise(matrix.trajectories());

        let mut remaining: Vec<usize> = (0..n).filter(|&i| i != start).collect();
        let mut placed = Vec::with_capacity(n);
        placed.push(start);

        while !remaining.is_empty() {
            let compare = self.window.select(&placed);

            let mut best = 0;
            let mut best_score = f64::INFINITY;
            for (pos, &candidate) in remaining.iter().enumerate() {
                let distances: Vec<f64> = compare.iter().map(|&p| dist[candidate][p]).collect();
                let score = l2_norm(&distances);
                if score < best_score {
                    best = pos;
                    best_score = score;
                }
            }
            let next = remaining.remove(best);
            log::trace!(
                "{} chain: placed {} (score {:.4})",
                self.name(),
                matrix.regions()[next],
                best_score
            );
            placed.push(next);
        }

        Ok(RegionOrdering::from_indices(&placed, matrix))
    }

    fn name(&self) -> &str {
        match self.window {
            ComparisonWindow::Recent(_) => "recent-distance",
            ComparisonWindow::Leading(_) => "anchor-distance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn days(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn matrix(columns: Vec<(&str, Vec<f64>)>) -> TimeSeriesMatrix {
        let n = columns[0].1.len();
        TimeSeriesMatrix::from_columns(days(n), columns).unwrap()
    }

    fn names(ordering: &RegionOrdering) -> Vec<&str> {
        ordering.iter().collect()
    }

    #[test]
    fn correlation_follows_most_recent() {
        let m = matrix(vec![
            ("C", vec![5.0, 1.0, 4.0, 2.0, 3.0]),
            ("A", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("B", vec![1.0, 2.0, 3.0, 5.0, 4.0]),
        ]);
        let ordering = CorrelationChain::new("A").order(&m).unwrap();
        assert_eq!(names(&ordering), vec!["A", "B", "C"]);
    }

    #[test]
    fn constant_series_goes_last_in_correlation_chain() {
        let m = matrix(vec![
            ("flat", vec![1.0; 4]),
            ("A", vec![1.0, 2.0, 3.0, 4.0]),
            ("B", vec![4.0, 3.0, 2.0, 1.0]),
        ]);
        let ordering = CorrelationChain::new("A").order(&m).unwrap();
        assert_eq!(names(&ordering), vec!["A", "B", "flat"]);
    }

    #[test]
    fn recent_window_slides() {
        // With a window of one, each step only looks at the previous region.
        let m = matrix(vec![
            ("A", vec![0.0, 0.0]),
            ("B", vec![1.0, 0.0]),
            ("C", vec![2.0, 0.0]),
            ("D", vec![3.0, 0.0]),
        ]);
        let ordering = DistanceChain::recent("D").width(1).order(&m).unwrap();
        assert_eq!(names(&ordering), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn leading_window_stays_fixed() {
        // Anchor at 0; a fixed single-region window always picks the next
        // closest to the anchor, not to the last placed region.
        let m = matrix(vec![
            ("far", vec![10.0]),
            ("anchor", vec![0.0]),
            ("near", vec![1.0]),
            ("mid", vec![-4.0]),
        ]);
        let leading = DistanceChain::leading("anchor").width(1).order(&m).unwrap();
        assert_eq!(names(&leading), vec!["anchor", "near", "mid", "far"]);

        let recent = DistanceChain::recent("anchor").width(1).order(&m).unwrap();
        assert_eq!(names(&recent), vec!["anchor", "near", "mid", "far"]);

        let m = matrix(vec![
            ("anchor", vec![0.0]),
            ("a", vec![3.0]),
            ("b", vec![6.0]),
            ("c", vec![-3.5]),
        ]);
        let leading = DistanceChain::leading("anchor").width(1).order(&m).unwrap();
        assert_eq!(names(&leading), vec!["anchor", "a", "c", "b"]);
        let recent = DistanceChain::recent("anchor").width(1).order(&m).unwrap();
        assert_eq!(names(&recent), vec!["anchor", "a", "b", "c"]);
    }

    #[test]
    fn ties_go_to_lowest_column() {
        let m = matrix(vec![
            ("right", vec![1.0, 0.0]),
            ("anchor", vec![0.0, 0.0]),
            ("left", vec![-1.0, 0.0]),
        ]);
        let ordering = DistanceChain::recent("anchor").order(&m).unwrap();
        assert_eq!(names(&ordering), vec!["anchor", "right", "left"]);

        let m = matrix(vec![("x", vec![1.0, 2.0]), ("anchor", vec![0.0, 1.0]), ("y", vec![1.0, 2.0])]);
        let ordering = CorrelationChain::new("anchor").order(&m).unwrap();
        assert_eq!(names(&ordering), vec!["anchor", "x", "y"]);
    }

    #[test]
    fn missing_anchor() {
        let m = matrix(vec![("A", vec![1.0]), ("B", vec![2.0])]);
        assert_eq!(
            CorrelationChain::new("Z").order(&m).unwrap_err(),
            RegionError::MissingAnchor("Z".to_string())
        );
        assert_eq!(
            DistanceChain::leading("Z").order(&m).unwrap_err(),
            RegionError::MissingAnchor("Z".to_string())
        );
    }

    #[test]
    fn zero_width_window_is_rejected() {
        let m = matrix(vec![("A", vec![1.0]), ("B", vec![2.0])]);
        assert!(matches!(
            DistanceChain::recent("A").width(0).order(&m),
            Err(RegionError::InvalidParameter(_))
        ));
    }

    #[test]
    fn names_and_windows() {
        assert_eq!(DistanceChain::recent("A").name(), "recent-distance");
        assert_eq!(DistanceChain::leading("A").name(), "anchor-distance");
        assert_eq!(
            DistanceChain::leading("A").window(),
            ComparisonWindow::Leading(DEFAULT_CHAIN_WINDOW)
        );
        assert_eq!(CorrelationChain::new("A").name(), "correlation");
    }
}
