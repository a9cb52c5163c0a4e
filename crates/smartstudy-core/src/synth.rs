//! Synthetic study-behaviour data for training.
//!
//! Every draw comes from the caller's generator. Seeding that generator
//! identically reproduces the sample set exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::features::{Feature, FeatureSource};

const STUDY_HOURS_RANGE: (f64, f64) = (2.0, 8.0);
const DIFFICULTY_PREFERENCE_RANGE: (f64, f64) = (0.3, 1.0);
const SESSION_DURATION_RANGE: (f64, f64) = (0.5, 3.0);
const SUBJECT_DIFFICULTY_RANGE: (f64, f64) = (0.4, 1.0);
const BREAK_FREQUENCY_RANGE: (f64, f64) = (0.1, 0.5);
const NOISE_AMPLITUDE: f64 = 0.2;

const STUDY_HOURS_WEIGHT: f64 = 0.2;
const DIFFICULTY_MATCH_WEIGHT: f64 = 0.3;
const SESSION_DURATION_WEIGHT: f64 = 0.15;
const BREAK_WEIGHT: f64 = 0.1;

/// One labelled row of synthetic study behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudySample {
    pub study_hours_per_day: f64,
    pub difficulty_preference: f64,
    /// 0 = morning, 1 = afternoon, 2 = evening
    pub time_of_day_pref: u8,
    /// Hours
    pub session_duration: f64,
    pub subject_difficulty: f64,
    /// Breaks per hour
    pub break_frequency: f64,
    /// Always within `[0, 1]`
    pub performance: f64,
}

impl FeatureSource for StudySample {
    fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::StudyHoursPerDay => self.study_hours_per_day,
            Feature::DifficultyPreference => self.difficulty_preference,
            Feature::TimeOfDayPref => f64::from(self.time_of_day_pref),
            Feature::SessionDuration => self.session_duration,
            Feature::SubjectDifficulty => self.subject_difficulty,
            Feature::BreakFrequency => self.break_frequency,
        }
    }
}

/// Noise-free performance score before clamping.
pub fn performance_signal(
    study_hours_per_day: f64,
    difficulty_preference: f64,
    session_duration: f64,
    subject_difficulty: f64,
    break_frequency: f64,
) -> f64 {
    study_hours_per_day * STUDY_HOURS_WEIGHT
        + (1.0 - (difficulty_preference - subject_difficulty).abs()) * DIFFICULTY_MATCH_WEIGHT
        + session_duration * SESSION_DURATION_WEIGHT
        + (1.0 - break_frequency) * BREAK_WEIGHT
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    rng.gen_range(low..=high)
}

/// Draw a single sample.
pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> StudySample {
    let study_hours_per_day = uniform(rng, STUDY_HOURS_RANGE);
    let difficulty_preference = uniform(rng, DIFFICULTY_PREFERENCE_RANGE);
    let time_of_day_pref = rng.gen_range(0..3u8);
    let session_duration = uniform(rng, SESSION_DURATION_RANGE);
    let subject_difficulty = uniform(rng, SUBJECT_DIFFICULTY_RANGE);
    let break_frequency = uniform(rng, BREAK_FREQUENCY_RANGE);

    let noise = uniform(rng, (-NOISE_AMPLITUDE, NOISE_AMPLITUDE));
    let performance = (performance_signal(
        study_hours_per_day,
        difficulty_preference,
        session_duration,
        subject_difficulty,
        break_frequency,
    ) + noise)
        .clamp(0.0, 1.0);

    StudySample {
        study_hours_per_day,
        difficulty_preference,
        time_of_day_pref,
        session_duration,
        subject_difficulty,
        break_frequency,
        performance,
    }
}

/// Generate `n_samples` labelled samples in draw order.
///
/// # Errors
///
/// Returns [`DataError::EmptySampleSet`] when `n_samples` is zero.
pub fn generate<R: Rng + ?Sized>(n_samples: usize, rng: &mut R) -> Result<Vec<StudySample>, DataError> {
    if n_samples == 0 {
        return Err(DataError::EmptySampleSet);
    }
    Ok((0..n_samples).map(|_| sample(rng)).collect())
}
