//! Single-component principal component analysis.
//!
//! Samples are rows (regions), features are columns (days). Only the leading
//! component is computed, from the symmetric eigendecomposition of the
//! `n_samples × n_samples` Gram matrix of the centered data. The matrix stays
//! small even when there are many more days than regions.
//!
//! # Sign convention
//!
//! An eigenvector is only defined up to sign. The returned component is
//! oriented so that its largest-magnitude loading is positive (the first one
//! if several share the largest magnitude). Scores inherit this orientation.

use super::stats::{dot, l2_norm};
use crate::error::{RegionError, Result};
use nalgebra::{DMatrix, SymmetricEigen};

/// Leading principal component of a sample set.
#[derive(Debug, Clone)]
pub struct PcaResult {
    /// Unit-length component in feature space.
    pub component: Vec<f64>,
    /// Per-feature mean removed before fitting.
    pub mean: Vec<f64>,
    /// Projection of each sample on the component.
    pub scores: Vec<f64>,
    /// Variance explained by the component (n - 1 denominator).
    pub explained_variance: f64,
}

impl PcaResult {
    /// Project a new sample on the fitted component.
    pub fn transform(&self, sample: &[f64]) -> f64 {
        sample
            .iter()
            .zip(self.mean.iter())
            .zip(self.component.iter())
            .map(|((x, m), c)| (x - m) * c)
            .sum()
    }
}

/// Fit the leading principal component.
pub fn first_component(samples: &[Vec<f64>]) -> Result<PcaResult> {
    let n = samples.len();
    if n < 2 {
        return Err(RegionError::InsufficientSamples { needed: 2, got: n });
    }
    let d = samples[0].len();
    for s in samples {
        if s.len() != d {
            return Err(RegionError::DimensionMismatch {
                expected: d,
                got: s.len(),
            });
        }
    }

    let mean: Vec<f64> = (0..d)
        .map(|j| samples.iter().map(|s| s[j]).sum::<f64>() / n as f64)
        .collect();
    let centered: Vec<Vec<f64>> = samples
        .iter()
        .map(|s| s.iter().zip(mean.iter()).map(|(x, m)| x - m).collect())
        .collect();

    let mut gram = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let g = dot(&centered[i], &centered[j]);
            gram[i][j] = g;
            gram[j][i] = g;
        }
    }

    let trace: f64 = (0..n).map(|i| gram[i][i]).sum();
    if trace <= 0.0 {
        // All samples coincide: no direction carries variance.
        return Ok(PcaResult {
            component: vec![0.0; d],
            mean,
            scores: vec![0.0; n],
            explained_variance: 0.0,
        });
    }

    let eigen = SymmetricEigen::new(DMatrix::from_fn(n, n, |i, j| gram[i][j]));
    let (top, eigenvalue) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_val), (i, &v)| {
            if v > best_val {
                (i, v)
            } else {
                (best, best_val)
            }
        });
    let u: Vec<f64> = eigen.eigenvectors.column(top).iter().copied().collect();

    let mut component: Vec<f64> = (0..d)
        .map(|j| centered.iter().zip(u.iter()).map(|(c, ui)| c[j] * ui).sum())
        .collect();
    let norm = l2_norm(&component);
    if norm > 0.0 {
        component.iter_mut().for_each(|c| *c /= norm);
    }

    let pivot = component
        .iter()
        .enumerate()
        .fold((0, 0.0_f64), |(best, best_abs), (j, c)| {
            if c.abs() > best_abs {
                (j, c.abs())
            } else {
                (best, best_abs)
            }
        })
        .0;
    if component.get(pivot).copied().unwrap_or(0.0) < 0.0 {
        component.iter_mut().for_each(|c| *c = -*c);
    }

    let scores = centered.iter().map(|c| dot(c, &component)).collect();

    Ok(PcaResult {
        component,
        mean,
        scores,
        explained_variance: eigenvalue.max(0.0) / (n - 1) as f64,
    })
}
