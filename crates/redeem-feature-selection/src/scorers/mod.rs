//! Reference scorers over `ndarray` data.
//!
//! Features are column indices of a sample-by-feature matrix and the score
//! of a feature set measures how much the selected columns explain a
//! target vector. Both scorers give the empty set a score of 0.
pub mod mutual_information;
pub mod r_squared;

pub use mutual_information::MutualInformation;
pub use r_squared::RSquared;

use anyhow::Result;
use ndarray::Array1;

use crate::feature_set::FeatureSet;
use crate::scorer::Scorer;

/// Score every column on its own.
///
/// # Returns
///
/// An array of shape (n_features,) where entry `i` is the score of `{i}`.
pub fn univariate_scores<S>(scorer: &S, n_features: usize) -> Result<Array1<f64>>
where
    S: Scorer<usize> + ?Sized,
{
    let mut scores = Array1::zeros(n_features);
    for i in 0..n_features {
        scores[i] = scorer.score(&FeatureSet::from([i]))?;
    }
    Ok(scores)
}

fn check_columns(features: &FeatureSet<usize>, n_features: usize) -> Result<()> {
    if let Some(&bad) = features.iter().find(|&&f| f >= n_features) {
        anyhow::bail!(
            "Feature index {} out of range for a matrix with {} columns",
            bad,
            n_features
        );
    }
    Ok(())
}
