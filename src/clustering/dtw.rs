//! Dynamic Time Warping (DTW) distance for region trajectories.
//!
//! DTW allows elastic alignment between time series. The local cost is the
//! squared difference and the reported distance is the square root of the
//! accumulated cost along the optimal path, so for two equal-length series
//! DTW never exceeds the Euclidean distance.

/// Accumulated cost matrix of size `(n + 1) × (m + 1)`.
///
/// With `window = Some(w)`, only cells within a Sakoe-Chiba band of `w`
/// (widened to at least `|n - m|`) are reachable.
fn accumulated_cost(a: &[f64], b: &[f64], window: Option<usize>) -> Vec<Vec<f64>> {
    let n = a.len();
    let m = b.len();
    let window = window.map(|w| w.max(n.abs_diff(m))).unwrap_or(n.max(m));

    let mut acc = vec![vec![f64::INFINITY; m + 1]; n + 1];
    acc[0][0] = 0.0;

    for i in 1..=n {
        let j_start = 1.max(i.saturating_sub(window));
        let j_end = m.min(i + window);

        for j in j_start..=j_end {
            let cost = (a[i - 1] - b[j - 1]).powi(2);
            acc[i][j] = cost + acc[i - 1][j].min(acc[i][j - 1]).min(acc[i - 1][j - 1]);
        }
    }

    acc
}

/// Compute the Dynamic Time Warping distance between two time series.
///
/// # Returns
/// DTW distance (lower is more similar), `INFINITY` if either series is empty.
pub fn dtw_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    accumulated_cost(a, b, None)[a.len()][b.len()].sqrt()
}

/// Compute DTW distance with a Sakoe-Chiba band constraint.
///
/// The band limits warping to within `window` positions, which bounds the
/// cost per pair and prevents pathological alignments.
pub fn dtw_distance_windowed(a: &[f64], b: &[f64], window: usize) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    accumulated_cost(a, b, Some(window))[a.len()][b.len()].sqrt()
}

/// Compute the DTW alignment path.
///
/// Returns pairs of indices `(i, j)` showing how elements of `a` and `b` are aligned,
/// from `(0, 0)` to `(n - 1, m - 1)`.
pub fn dtw_path(a: &[f64], b: &[f64], window: Option<usize>) -> Vec<(usize, usize)> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let acc = accumulated_cost(a, b, window);

    let mut path = Vec::with_capacity(a.len() + b.len());
    let mut i = a.len();
    let mut j = b.len();

    while i > 0 && j > 0 {
        path.push((i - 1, j - 1));

        if i == 1 {
            j -= 1;
            continue;
        }
        if j == 1 {
            i -= 1;
            continue;
        }

        let diag = acc[i - 1][j - 1];
        let left = acc[i][j - 1];
        let up = acc[i - 1][j];

        if diag <= left && diag <= up {
            i -= 1;
            j -= 1;
        } else if left < up {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    path.reverse();
    path
}

/// Euclidean distance for same-length time series.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==================== dtw_distance ====================

    #[test]
    fn dtw_identical_series() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(dtw_distance(&a, &a), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_shifted_series() {
        let a = vec![0.0, 0.0, 1.0, 2.0, 1.0, 0.0];
        let b = vec![0.0, 1.0, 2.0, 1.0, 0.0, 0.0];

        let dtw_dist = dtw_distance(&a, &b);
        let eucl_dist = euclidean_distance(&a, &b);

        assert_relative_eq!(dtw_dist, 0.0, epsilon = 1e-10);
        assert!(eucl_dist > 1.0);
    }

    #[test]
    fn dtw_never_exceeds_euclidean() {
        let a = vec![0.3, 1.7, 2.2, 0.1, -1.0, 0.4];
        let b = vec![1.1, 0.2, 2.9, 1.5, 0.0, -0.3];
        assert!(dtw_distance(&a, &b) <= euclidean_distance(&a, &b) + 1e-12);
    }

    #[test]
    fn dtw_different_lengths() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let dist = dtw_distance(&a, &b);
        assert!(!dist.is_nan());
        // (4-3)^2 + (5-3)^2
        assert_relative_eq!(dist, 5.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn dtw_empty() {
        assert_eq!(dtw_distance(&[], &[1.0, 2.0]), f64::INFINITY);
        assert_eq!(dtw_distance(&[1.0, 2.0], &[]), f64::INFINITY);
        assert_eq!(dtw_distance(&[], &[]), f64::INFINITY);
    }

    #[test]
    fn dtw_single_element() {
        assert_relative_eq!(dtw_distance(&[5.0], &[3.0]), 2.0, epsilon = 1e-10);
    }

    // ==================== dtw_distance_windowed ====================

    #[test]
    fn dtw_windowed_identical() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(dtw_distance_windowed(&a, &a, 2), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_windowed_vs_full() {
        let a = vec![0.0, 0.0, 0.0, 1.0, 2.0, 1.0];
        let b = vec![1.0, 2.0, 1.0, 0.0, 0.0, 0.0];

        let full = dtw_distance(&a, &b);
        let windowed = dtw_distance_windowed(&a, &b, 1);

        assert!(windowed >= full - 1e-10);
    }

    #[test]
    fn dtw_window_zero_is_euclidean() {
        let a = vec![0.0, 1.0, 4.0];
        let b = vec![1.0, 1.0, 2.0];
        assert_relative_eq!(
            dtw_distance_windowed(&a, &b, 0),
            euclidean_distance(&a, &b),
            epsilon = 1e-10
        );
    }

    // ==================== dtw_path ====================

    #[test]
    fn dtw_path_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert_eq!(dtw_path(&a, &a, None), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn dtw_path_different_lengths() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 2.5, 3.0];

        let path = dtw_path(&a, &b, None);

        assert_eq!(path[0], (0, 0));
        assert_eq!(path[path.len() - 1], (2, 3));
        for w in path.windows(2) {
            assert!(w[1].0 >= w[0].0 && w[1].1 >= w[0].1);
            assert!(w[1].0 - w[0].0 <= 1 && w[1].1 - w[0].1 <= 1);
        }
    }

    #[test]
    fn dtw_path_empty() {
        assert!(dtw_path(&[], &[1.0], None).is_empty());
        assert!(dtw_path(&[1.0], &[], None).is_empty());
    }

    // ==================== euclidean_distance ====================

    #[test]
    fn euclidean_basic() {
        assert_relative_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0, epsilon = 1e-10);
    }

    #[test]
    fn euclidean_different_lengths() {
        assert_eq!(euclidean_distance(&[1.0, 2.0], &[1.0, 2.0, 3.0]), f64::INFINITY);
    }
}
