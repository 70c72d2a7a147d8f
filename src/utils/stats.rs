//! Statistical and distance primitives shared by the orderers.

use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fractional ranks (1-based), ties get the average of their positions.
pub fn ranks(values: &[f64]) -> Vec<f64> {
    let mut data = Data::new(values.to_vec());
    data.ranks(RankTieBreaker::Average)
}

/// Pearson correlation coefficient.
///
/// Returns NaN when the lengths differ, when fewer than two points are given,
/// or when either series is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return f64::NAN;
    }

    let ma = mean(a);
    let mb = mean(b);

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - ma;
        let dy = y - mb;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
}

/// Spearman rank correlation: Pearson correlation of the average ranks.
pub fn spearman(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return f64::NAN;
    }
    pearson(&ranks(a), &ranks(b))
}

/// Symmetric Spearman correlation matrix; the diagonal is 1 for non-constant series.
pub fn spearman_matrix(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let ranked: Vec<Vec<f64>> = series.iter().map(|s| ranks(s)).collect();
    let n = ranked.len();
    let mut corr = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pearson(&ranked[i], &ranked[j]);
            corr[i][j] = r;
            corr[j][i] = r;
        }
    }

    corr
}

/// Euclidean norm of a vector.
pub fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Dot product of two same-length vectors.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Pairwise Euclidean distance matrix between series.
pub fn euclidean_pairwise(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = series.len();
    let mut dist = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let d = crate::clustering::euclidean_distance(&series[i], &series[j]);
            dist[i][j] = d;
            dist[j][i] = d;
        }
    }

    dist
}
