//! Principal component projection of samples.
//!
//! Samples are the observations and proteins the features, matching the PCA
//! step of the upstream analysis where replicates are projected to check
//! group separation. Rendering of the projection is out of scope; this module
//! produces the scores and explained-variance ratios a plot consumes.

use crate::matrix::AbundanceMatrix;
use anyhow::{Result, anyhow};
use log::debug;
use nalgebra::DMatrix;
use ndarray::Array2;

/// Scores and explained variance of a PCA projection.
#[derive(Debug, Clone)]
pub struct PcaProjection {
    sample_ids: Vec<String>,
    /// samples x components score matrix
    scores: Array2<f64>,
    explained_variance_ratio: Vec<f64>,
}

impl PcaProjection {
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    pub fn n_components(&self) -> usize {
        self.scores.ncols()
    }

    /// Fraction of total variance carried by each retained component,
    /// descending.
    pub fn explained_variance_ratio(&self) -> &[f64] {
        &self.explained_variance_ratio
    }
}

/// Project samples onto the first `n_components` principal components.
///
/// Protein features are mean-centered across samples, the centered matrix is
/// decomposed by SVD, and sample scores are `U * Sigma` truncated to the
/// requested components. Typically run on a z-scored matrix (see
/// [`crate::scale::zscore_rows`]).
pub fn pca(matrix: &AbundanceMatrix, n_components: usize) -> Result<PcaProjection> {
    let n_samples = matrix.n_samples();
    let n_features = matrix.n_proteins();
    let max_components = n_samples.min(n_features);

    if max_components == 0 {
        return Err(anyhow!("PCA requires a non-empty matrix"));
    }
    if n_components == 0 || n_components > max_components {
        return Err(anyhow!(
            "Component count must be within 1..={}, got {}",
            max_components,
            n_components
        ));
    }

    debug!(
        "PCA over {} samples x {} protein features, keeping {} components",
        n_samples, n_features, n_components
    );

    // Observations are samples: transpose to samples x proteins and center
    // each feature column.
    let observations = matrix.values().t().to_owned();
    let feature_means: Vec<f64> = (0..n_features)
        .map(|j| observations.column(j).sum() / n_samples as f64)
        .collect();

    let centered = DMatrix::from_fn(n_samples, n_features, |i, j| {
        observations[[i, j]] - feature_means[j]
    });

    let svd = centered.svd(true, false);
    let u = svd
        .u
        .ok_or_else(|| anyhow!("SVD did not produce the left singular vectors"))?;
    let singular_values = svd.singular_values;

    let mut scores = Array2::zeros((n_samples, n_components));
    for i in 0..n_samples {
        for k in 0..n_components {
            scores[[i, k]] = u[(i, k)] * singular_values[k];
        }
    }

    let total_variance: f64 = singular_values.iter().map(|s| s * s).sum();
    let explained_variance_ratio = (0..n_components)
        .map(|k| {
            if total_variance == 0.0 {
                0.0
            } else {
                singular_values[k] * singular_values[k] / total_variance
            }
        })
        .collect();

    Ok(PcaProjection {
        sample_ids: matrix.samples().to_vec(),
        scores,
        explained_variance_ratio,
    })
}
