//! Regression metrics.

use crate::error::DataError;

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// When `actual` is constant the ratio is undefined; the score is 1.0 for a
/// perfect fit and 0.0 otherwise, so it is always finite.
///
/// # Errors
///
/// Returns an error if the inputs are empty or have different lengths.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64, DataError> {
    if actual.is_empty() {
        return Err(DataError::EmptySampleSet);
    }
    if actual.len() != predicted.len() {
        return Err(DataError::ShapeMismatch(format!(
            "actual length {} != predicted length {}",
            actual.len(),
            predicted.len()
        )));
    }

    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Mean absolute error.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, DataError> {
    if actual.is_empty() {
        return Err(DataError::EmptySampleSet);
    }
    if actual.len() != predicted.len() {
        return Err(DataError::ShapeMismatch(format!(
            "actual length {} != predicted length {}",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64)
}
