//! Ordinary least squares with an intercept.

use serde::{Deserialize, Serialize};

use super::{check_targets, Regressor};
use crate::error::{DataError, ModelError};
use crate::features::FeatureMatrix;

/// Relative pivot tolerance for the normal-equation solve.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Linear model `y = intercept + w . x`.
///
/// Columns with zero variance in the training data get weight 0.0 instead of
/// making the system singular.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    intercept: f64,
    weights: Vec<f64>,
}

impl LinearRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model with known coefficients.
    pub fn from_coefficients(intercept: f64, weights: Vec<f64>) -> Self {
        Self { intercept, weights }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Regressor for LinearRegressor {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), DataError> {
        check_targets(features, targets)?;

        let n_rows = features.n_rows();
        let n_cols = features.n_features();
        let n = n_rows as f64;

        let x_mean: Vec<f64> = (0..n_cols)
            .map(|c| (0..n_rows).map(|r| features.get(r, c)).sum::<f64>() / n)
            .collect();
        let y_mean = targets.iter().sum::<f64>() / n;

        let active: Vec<usize> = (0..n_cols)
            .filter(|&c| (1..n_rows).any(|r| features.get(r, c) != features.get(0, c)))
            .collect();

        // Normal equations on centred data: (Xc' Xc) w = Xc' yc
        let k = active.len();
        let mut gram = vec![0.0; k * k];
        let mut rhs = vec![0.0; k];
        for r in 0..n_rows {
            let yc = targets[r] - y_mean;
            for (i, &ci) in active.iter().enumerate() {
                let xi = features.get(r, ci) - x_mean[ci];
                rhs[i] += xi * yc;
                for (j, &cj) in active.iter().enumerate().skip(i) {
                    gram[i * k + j] += xi * (features.get(r, cj) - x_mean[cj]);
                }
            }
        }
        for i in 0..k {
            for j in 0..i {
                gram[i * k + j] = gram[j * k + i];
            }
        }

        let solved = solve_linear_system(&gram, &rhs, k)?;

        let mut weights = vec![0.0; n_cols];
        for (&c, w) in active.iter().zip(solved) {
            weights[c] = w;
        }
        let intercept = y_mean
            - weights
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        tracing::debug!(intercept, ?weights, "fitted linear regressor");

        self.intercept = intercept;
        self.weights = weights;
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotTrained("linear regressor has not been fitted".into()));
        }
        features.expect_width(self.weights.len())?;
        Ok(features
            .rows()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        !self.weights.is_empty()
    }

    fn name(&self) -> &str {
        "linear_regression"
    }
}

/// Solve `Ax = b` via Gaussian elimination with partial pivoting.
/// `a` is row-major n x n.
fn solve_linear_system(a: &[f64], b: &[f64], n: usize) -> Result<Vec<f64>, DataError> {
    let width = n + 1;
    let mut aug = vec![0.0; n * width];
    for i in 0..n {
        aug[i * width..i * width + n].copy_from_slice(&a[i * n..(i + 1) * n]);
        aug[i * width + n] = b[i];
    }

    let scale = (0..n).map(|i| a[i * n + i].abs()).fold(0.0, f64::max);
    let tolerance = PIVOT_TOLERANCE * scale.max(f64::MIN_POSITIVE);

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[col * width + col].abs();
        for row in (col + 1)..n {
            let val = aug[row * width + col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }
        if max_val < tolerance {
            return Err(DataError::SingularSystem);
        }
        if max_row != col {
            for j in 0..width {
                aug.swap(col * width + j, max_row * width + j);
            }
        }
        let pivot = aug[col * width + col];
        for row in (col + 1)..n {
            let factor = aug[row * width + col] / pivot;
            for j in col..width {
                let above = aug[col * width + j];
                aug[row * width + j] -= factor * above;
            }
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = aug[i * width + n];
        for j in (i + 1)..n {
            sum -= aug[i * width + j] * x[j];
        }
        x[i] = sum / aug[i * width + i];
    }
    Ok(x)
}
