//! Core error types for smartstudy-core.
//!
//! Errors are grouped by the caller's remedy: synthesise different data,
//! train before recommending, or fix the supplied profile.

use thiserror::Error;

/// Core error type for smartstudy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Training data is insufficient or degenerate
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Models are missing or incomplete
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Training-data errors.
///
/// Not retried internally; synthesis and training are deterministic, so the
/// caller has to try again with a different seed or sample count.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Zero samples were requested or supplied
    #[error("Sample set is empty: at least one sample is required")]
    EmptySampleSet,

    /// The train/test split left a partition empty
    #[error("Not enough samples to split: {total} samples gave {train} train / {test} test")]
    InsufficientSamples {
        total: usize,
        train: usize,
        test: usize,
    },

    /// The train targets do not vary enough to score a model
    #[error("Degenerate target: train partition has {distinct} distinct value(s), need at least 2")]
    DegenerateTarget { distinct: usize },

    /// Matrix and target dimensions disagree
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The least-squares normal equations could not be solved
    #[error("Singular system: features are collinear")]
    SingularSystem,
}

/// Model availability errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Recommend was invoked without a complete trained model set
    #[error("Model not trained: {0}")]
    NotTrained(String),

    /// A feature vector does not match the width the model was fitted on
    #[error("Feature count mismatch: model expects {expected}, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: String, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_converts_into_core_error() {
        let err: CoreError = DataError::EmptySampleSet.into();
        assert!(matches!(err, CoreError::Data(DataError::EmptySampleSet)));
    }

    #[test]
    fn messages_name_the_offending_field() {
        let err = ValidationError::invalid("preferred_study_hours", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'preferred_study_hours': must be positive"
        );
    }

    #[test]
    fn degenerate_target_reports_distinct_count() {
        let err = DataError::DegenerateTarget { distinct: 1 };
        assert!(err.to_string().contains("1 distinct"));
    }
}
