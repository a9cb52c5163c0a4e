//! Per-column standardization.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, ModelError};
use crate::features::FeatureMatrix;

/// Zero-mean, unit-variance scaler.
///
/// Statistics are population (ddof = 0). A constant column keeps scale 1.0,
/// so it is centred but not divided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scaler from precomputed statistics.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ShapeMismatch`] if the lengths differ or a scale
    /// is not strictly positive.
    pub fn from_parts(means: Vec<f64>, scales: Vec<f64>) -> Result<Self, DataError> {
        if means.len() != scales.len() {
            return Err(DataError::ShapeMismatch(format!(
                "means length {} != scales length {}",
                means.len(),
                scales.len()
            )));
        }
        if scales.iter().any(|s| !(*s > 0.0)) {
            return Err(DataError::ShapeMismatch("scales must be > 0".into()));
        }
        Ok(Self { means, scales })
    }

    /// Identity transform over `n_features` columns.
    pub fn identity(n_features: usize) -> Self {
        Self {
            means: vec![0.0; n_features],
            scales: vec![1.0; n_features],
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.means.is_empty()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Learn column statistics from `features`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::EmptySampleSet`] for an empty matrix.
    pub fn fit(&mut self, features: &FeatureMatrix) -> Result<(), DataError> {
        if features.is_empty() {
            return Err(DataError::EmptySampleSet);
        }
        let n_rows = features.n_rows();
        let n = n_rows as f64;
        let n_cols = features.n_features();

        let mut means = Vec::with_capacity(n_cols);
        let mut scales = Vec::with_capacity(n_cols);
        for col in 0..n_cols {
            let mean = (0..n_rows).map(|r| features.get(r, col)).sum::<f64>() / n;
            let var = (0..n_rows)
                .map(|r| (features.get(r, col) - mean).powi(2))
                .sum::<f64>()
                / n;
            let std = var.sqrt();
            if std == 0.0 {
                tracing::warn!(column = col, "constant feature column; leaving unscaled");
            }
            means.push(mean);
            scales.push(if std == 0.0 { 1.0 } else { std });
        }

        self.means = means;
        self.scales = scales;
        Ok(())
    }

    /// Apply the fitted statistics without refitting.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotTrained`] before `fit`, or a width mismatch.
    pub fn transform(&self, features: &FeatureMatrix) -> Result<FeatureMatrix, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotTrained("scaler has not been fitted".into()));
        }
        features.expect_width(self.means.len())?;
        Ok(features.map_rows(|row, out| {
            out.extend(
                row.iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (m, s))| (v - m) / s),
            );
        }))
    }

    /// Fit on `features` and return them transformed.
    pub fn fit_transform(&mut self, features: &FeatureMatrix) -> Result<FeatureMatrix, DataError> {
        self.fit(features)?;
        self.transform(features)
            .map_err(|e| DataError::ShapeMismatch(e.to_string()))
    }
}
