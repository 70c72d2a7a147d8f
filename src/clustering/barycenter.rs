//! DTW barycenter averaging (DBA).
//!
//! Refines a centroid so that it minimizes the summed squared DTW distance to
//! a set of series. Each pass aligns every member to the current centroid and
//! replaces each centroid sample with the mean of the member samples aligned
//! to it. The result keeps the centroid length and is generally not equal to
//! any member.

use super::dtw::dtw_path;

/// Average `members` under DTW, starting from `init`.
///
/// Stops after `max_iter` passes or when the summed alignment cost changes by
/// less than `tolerance`.
pub fn dtw_barycenter(
    members: &[&[f64]],
    init: &[f64],
    max_iter: usize,
    window: Option<usize>,
    tolerance: f64,
) -> Vec<f64> {
    if members.is_empty() || init.is_empty() {
        return init.to_vec();
    }

    let len = init.len();
    let mut centroid = init.to_vec();
    let mut prev_cost = f64::INFINITY;

    for _ in 0..max_iter {
        let mut sums = vec![0.0; len];
        let mut counts = vec![0usize; len];
        let mut cost = 0.0;

        for member in members {
            for (i, j) in dtw_path(&centroid, member, window) {
                sums[i] += member[j];
                counts[i] += 1;
                cost += (centroid[i] - member[j]).powi(2);
            }
        }

        centroid = sums
            .iter()
            .zip(counts.iter())
            .zip(centroid.iter())
            .map(|((&s, &c), &old)| if c > 0 { s / c as f64 } else { old })
            .collect();

        if (prev_cost - cost).abs() < tolerance {
            break;
        }
        prev_cost = cost;
    }

    centroid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::dtw::dtw_distance;
    use approx::assert_relative_eq;

    #[test]
    fn barycenter_of_identical_members() {
        let s = vec![0.0, 1.0, 3.0, 1.0, 0.0];
        let members: Vec<&[f64]> = vec![&s, &s, &s];
        let c = dtw_barycenter(&members, &[0.0; 5], 20, None, 1e-9);
        for (a, b) in c.iter().zip(s.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn barycenter_is_between_members() {
        let a = vec![0.0, 0.0, 2.0, 0.0, 0.0];
        let b = vec![0.0, 0.0, 4.0, 0.0, 0.0];
        let members: Vec<&[f64]> = vec![&a, &b];
        let c = dtw_barycenter(&members, &a, 20, None, 1e-9);
        assert_relative_eq!(c[2], 3.0, epsilon = 1e-9);

        let total = |x: &[f64]| dtw_distance(x, &a).powi(2) + dtw_distance(x, &b).powi(2);
        assert!(total(&c) <= total(&a) + 1e-12);
    }

    #[test]
    fn barycenter_keeps_length() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![2.0, 3.0, 4.0, 5.0];
        let members: Vec<&[f64]> = vec![&a, &b];
        let c = dtw_barycenter(&members, &a, 5, Some(1), 1e-9);
        assert_eq!(c.len(), 4);
    }
}
