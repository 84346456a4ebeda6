use anyhow::Result;
use ndarray::{Array1, Array2, Axis};
use statrs::statistics::Statistics;

use super::check_columns;
use crate::feature_set::FeatureSet;
use crate::scorer::Scorer;

/// Coefficient of determination of a least-squares fit.
///
/// The score of a feature set `S` is the R² of regressing the target on
/// the columns in `S` with an intercept. Linearly dependent columns are
/// dropped from the fit, so a column that is a linear combination of the
/// others contributes nothing.
#[derive(Debug, Clone)]
pub struct RSquared {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl RSquared {
    /// # Arguments
    ///
    /// * `x` - A 2D array of shape (n_samples, n_features).
    /// * `y` - A 1D array of shape (n_samples,) representing the target vector.
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self> {
        if x.nrows() != y.len() {
            anyhow::bail!(
                "Feature matrix has {} rows but target has {} values",
                x.nrows(),
                y.len()
            );
        }
        Ok(RSquared { x, y })
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Every column index of the data matrix.
    pub fn features(&self) -> FeatureSet<usize> {
        (0..self.x.ncols()).collect()
    }
}

impl Scorer<usize> for RSquared {
    fn score(&self, features: &FeatureSet<usize>) -> Result<f64> {
        check_columns(features, self.x.ncols())?;
        if self.y.is_empty() || features.is_empty() {
            return Ok(0.0);
        }

        let y_mean = Statistics::mean(self.y.iter());
        let y_centered = self.y.mapv(|v| v - y_mean);
        let ss_tot = y_centered.dot(&y_centered);
        if ss_tot <= f64::EPSILON {
            return Ok(0.0);
        }

        let columns = features.to_vec();
        let mut x = self.x.select(Axis(1), &columns);
        for mut col in x.columns_mut() {
            let col_mean = Statistics::mean(col.iter());
            col.mapv_inplace(|v| v - col_mean);
        }

        let gram = x.t().dot(&x);
        let rhs = x.t().dot(&y_centered);
        let beta = solve_normal_equations(gram, rhs);

        let residuals = &y_centered - &x.dot(&beta);
        let ss_res = residuals.dot(&residuals);

        Ok((1.0 - ss_res / ss_tot).clamp(0.0, 1.0))
    }
}

/// Solve `a * beta = b` for a symmetric positive semi-definite `a` by
/// Gaussian elimination with partial pivoting.
///
/// Columns without a usable pivot are treated as dependent and get a zero
/// coefficient.
fn solve_normal_equations(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let k = b.len();
    let scale = a.diag().iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let tol = scale * 1e-10;

    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(k);
    let mut row = 0;
    for col in 0..k {
        if row == k {
            break;
        }
        let (best, best_abs) = (row..k)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((row, f64::NEG_INFINITY), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        if best_abs <= tol {
            continue;
        }
        if best != row {
            for c in 0..k {
                a.swap([row, c], [best, c]);
            }
            b.swap(row, best);
        }
        for r in row + 1..k {
            let factor = a[[r, col]] / a[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for c in col..k {
                a[[r, c]] -= factor * a[[row, c]];
            }
            b[r] -= factor * b[row];
        }
        pivots.push((row, col));
        row += 1;
    }

    let mut beta = Array1::zeros(k);
    for &(r, c) in pivots.iter().rev() {
        let mut acc = b[r];
        for j in c + 1..k {
            acc -= a[[r, j]] * beta[j];
        }
        beta[c] = acc / a[[r, c]];
    }
    beta
}
