//! Feature schema and row-major feature matrices.
//!
//! Both regressors consume vectors laid out by a [`FeatureSchema`]. The
//! schema a model set was trained with travels inside the
//! [`TrainedModelSet`](crate::TrainedModelSet) and is the only order in which
//! inference may present features.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, ModelError};

/// One input column of the performance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    StudyHoursPerDay,
    DifficultyPreference,
    TimeOfDayPref,
    SessionDuration,
    SubjectDifficulty,
    BreakFrequency,
}

impl Feature {
    /// All features in canonical training order.
    pub const ALL: [Feature; 6] = [
        Feature::StudyHoursPerDay,
        Feature::DifficultyPreference,
        Feature::TimeOfDayPref,
        Feature::SessionDuration,
        Feature::SubjectDifficulty,
        Feature::BreakFrequency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::StudyHoursPerDay => "study_hours_per_day",
            Feature::DifficultyPreference => "difficulty_preference",
            Feature::TimeOfDayPref => "time_of_day_pref",
            Feature::SessionDuration => "session_duration",
            Feature::SubjectDifficulty => "subject_difficulty",
            Feature::BreakFrequency => "break_frequency",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can report a value for each [`Feature`].
///
/// Implemented by training samples and by recommendation candidates so both
/// go through the same schema when they become matrix rows.
pub trait FeatureSource {
    fn feature(&self, feature: Feature) -> f64;
}

/// Ordered list of features shared by training and inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    features: Vec<Feature>,
}

impl FeatureSchema {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.features.iter().map(|f| f.name()).collect()
    }

    /// True when every feature appears exactly once.
    pub fn is_complete(&self) -> bool {
        self.features.len() == Feature::ALL.len()
            && Feature::ALL.iter().all(|f| self.features.contains(f))
    }

    /// Lay out one source as a vector in schema order.
    pub fn vector<S: FeatureSource>(&self, source: &S) -> Vec<f64> {
        self.features.iter().map(|&f| source.feature(f)).collect()
    }

    /// Build a matrix with one row per source, columns in schema order.
    pub fn matrix<'a, S, I>(&self, sources: I) -> FeatureMatrix
    where
        S: FeatureSource + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        let mut matrix = FeatureMatrix::with_columns(self.len());
        for source in sources {
            matrix.data.extend(self.features.iter().map(|&f| source.feature(f)));
        }
        matrix
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(Feature::ALL.to_vec())
    }
}

/// Flat row-major `n_rows x n_features` matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    n_features: usize,
}

impl FeatureMatrix {
    /// An empty matrix with a fixed column count.
    pub fn with_columns(n_features: usize) -> Self {
        Self {
            data: Vec::new(),
            n_features,
        }
    }

    /// Wrap existing row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::ShapeMismatch`] if `n_features` is zero or does
    /// not divide the data length.
    pub fn from_flat(data: Vec<f64>, n_features: usize) -> Result<Self, DataError> {
        if n_features == 0 {
            return Err(DataError::ShapeMismatch("n_features must be > 0".into()));
        }
        if data.len() % n_features != 0 {
            return Err(DataError::ShapeMismatch(format!(
                "data length {} not divisible by n_features {}",
                data.len(),
                n_features
            )));
        }
        Ok(Self { data, n_features })
    }

    /// A single-row matrix.
    pub fn from_row(row: Vec<f64>) -> Self {
        let n_features = row.len();
        Self {
            data: row,
            n_features,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_rows(&self) -> usize {
        if self.n_features == 0 {
            0
        } else {
            self.data.len() / self.n_features
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n_features..(i + 1) * self.n_features]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_features.max(1))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_features + col]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Fail unless the matrix has exactly `expected` columns.
    pub fn expect_width(&self, expected: usize) -> Result<(), ModelError> {
        if self.n_features != expected {
            return Err(ModelError::FeatureCountMismatch {
                expected,
                actual: self.n_features,
            });
        }
        Ok(())
    }

    pub(crate) fn map_rows<F>(&self, mut f: F) -> FeatureMatrix
    where
        F: FnMut(&[f64], &mut Vec<f64>),
    {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.rows() {
            f(row, &mut data);
        }
        FeatureMatrix {
            data,
            n_features: self.n_features,
        }
    }
}
