//! Regression models and the preprocessing they share.
//!
//! - [`DecisionTreeRegressor`]: CART regression tree on raw features
//! - [`LinearRegressor`]: ordinary least squares on standardized features
//! - [`StandardScaler`]: per-column z-score transform fitted on training data
//! - [`r2_score`]: coefficient of determination for held-out evaluation

pub mod linear;
pub mod metrics;
pub mod scaler;
pub mod tree;

pub use linear::LinearRegressor;
pub use metrics::r2_score;
pub use scaler::StandardScaler;
pub use tree::{DecisionTreeRegressor, TreeParams};

use serde::{Deserialize, Serialize};

use crate::error::{DataError, ModelError};
use crate::features::FeatureMatrix;

/// Shared contract for the performance models.
///
/// Both models are fitted and queried through this trait, so the engine can
/// score candidates without knowing which concrete model it holds.
pub trait Regressor: Send + Sync {
    /// Fit on `features` (one row per target).
    ///
    /// # Errors
    ///
    /// Returns a [`DataError`] when shapes disagree or the data cannot be fitted.
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), DataError>;

    /// One prediction per row of `features`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotTrained`] before `fit` has succeeded, and
    /// [`ModelError::FeatureCountMismatch`] for the wrong row width.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError>;

    fn is_fitted(&self) -> bool;

    fn name(&self) -> &str;
}

/// Which representation of a feature vector a model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSpace {
    /// Feature values as assembled from the schema
    Raw,
    /// Values passed through the trained [`StandardScaler`]
    Scaled,
}

pub(crate) fn check_targets(features: &FeatureMatrix, targets: &[f64]) -> Result<(), DataError> {
    if features.is_empty() || targets.is_empty() {
        return Err(DataError::EmptySampleSet);
    }
    if features.n_rows() != targets.len() {
        return Err(DataError::ShapeMismatch(format!(
            "targets length {} != n_rows {}",
            targets.len(),
            features.n_rows()
        )));
    }
    Ok(())
}
