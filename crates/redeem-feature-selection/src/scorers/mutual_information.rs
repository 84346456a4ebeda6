use std::collections::HashMap;

use anyhow::Result;
use ndarray::{Array1, Array2};

use super::check_columns;
use crate::feature_set::FeatureSet;
use crate::scorer::Scorer;

/// Mutual information between a set of discrete columns and a discrete target.
///
/// The score of a feature set `S` is `I(X_S; Y)` in nats, computed from the
/// empirical joint distribution of the row tuples restricted to `S` and the
/// target values. Adding a column never lowers the score, and a column that
/// duplicates another adds nothing, which is what the redundancy pass of the
/// incremental selection looks for.
#[derive(Debug, Clone)]
pub struct MutualInformation {
    x: Array2<i64>,
    y: Array1<i64>,
}

impl MutualInformation {
    /// # Arguments
    ///
    /// * `x` - A 2D array of shape (n_samples, n_features) of discrete values.
    /// * `y` - A 1D array of shape (n_samples,) of class labels.
    pub fn new(x: Array2<i64>, y: Array1<i64>) -> Result<Self> {
        if x.nrows() != y.len() {
            anyhow::bail!(
                "Feature matrix has {} rows but target has {} values",
                x.nrows(),
                y.len()
            );
        }
        Ok(MutualInformation { x, y })
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Every column index of the data matrix.
    pub fn features(&self) -> FeatureSet<usize> {
        (0..self.x.ncols()).collect()
    }
}

impl Scorer<usize> for MutualInformation {
    fn score(&self, features: &FeatureSet<usize>) -> Result<f64> {
        check_columns(features, self.x.ncols())?;
        let n_samples = self.x.nrows();
        if n_samples == 0 || features.is_empty() {
            return Ok(0.0);
        }

        let columns = features.to_vec();
        let mut x_counts: HashMap<Vec<i64>, usize> = HashMap::new();
        let mut y_counts: HashMap<i64, usize> = HashMap::new();
        let mut joint_counts: HashMap<(Vec<i64>, i64), usize> = HashMap::new();

        for (row, &label) in self.x.outer_iter().zip(self.y.iter()) {
            let key: Vec<i64> = columns.iter().map(|&c| row[c]).collect();
            *x_counts.entry(key.clone()).or_insert(0) += 1;
            *y_counts.entry(label).or_insert(0) += 1;
            *joint_counts.entry((key, label)).or_insert(0) += 1;
        }

        let n = n_samples as f64;
        let mi: f64 = joint_counts
            .iter()
            .map(|((key, label), &count)| {
                let c_xy = count as f64;
                let c_x = x_counts[key] as f64;
                let c_y = y_counts[label] as f64;
                c_xy / n * (c_xy * n / (c_x * c_y)).ln()
            })
            .sum();

        // rounding can leave a tiny negative value for independent columns
        Ok(mi.max(0.0))
    }
}
