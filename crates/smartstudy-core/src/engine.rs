//! Recommendation search over a fixed grid of session configurations.
//!
//! Every candidate is combined with the user's profile, laid out in the
//! trained schema order, scored by each model in the set, and blended with an
//! unweighted mean. Ranking is a stable descending sort, so ties keep grid
//! order and output is fully deterministic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result, ValidationError};
use crate::features::{Feature, FeatureSource};
use crate::model::InputSpace;
use crate::profile::UserProfile;
use crate::time;
use crate::trainer::TrainedModelSet;

/// Session lengths searched, in hours (outer loop).
pub const SESSION_DURATIONS: [f64; 4] = [1.0, 1.5, 2.0, 2.5];
/// Subject difficulties searched (middle loop).
pub const SUBJECT_DIFFICULTIES: [f64; 3] = [0.4, 0.6, 0.8];
/// Breaks per hour searched (inner loop).
pub const BREAK_FREQUENCIES: [f64; 3] = [0.2, 0.3, 0.4];

pub const GRID_SIZE: usize =
    SESSION_DURATIONS.len() * SUBJECT_DIFFICULTIES.len() * BREAK_FREQUENCIES.len();

pub const DEFAULT_TOP_K: usize = 5;

/// A session configuration from the search grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub session_duration: f64,
    pub subject_difficulty: f64,
    pub break_frequency: f64,
}

/// The full grid in nested order: duration, then difficulty, then breaks.
pub fn candidate_grid() -> Vec<Candidate> {
    let mut grid = Vec::with_capacity(GRID_SIZE);
    for &session_duration in &SESSION_DURATIONS {
        for &subject_difficulty in &SUBJECT_DIFFICULTIES {
            for &break_frequency in &BREAK_FREQUENCIES {
                grid.push(Candidate {
                    session_duration,
                    subject_difficulty,
                    break_frequency,
                });
            }
        }
    }
    grid
}

/// A candidate paired with the profile it is scored for.
struct ScoringInput<'a> {
    profile: &'a UserProfile,
    candidate: &'a Candidate,
}

impl FeatureSource for ScoringInput<'_> {
    fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::StudyHoursPerDay => self.profile.preferred_study_hours(),
            Feature::DifficultyPreference => self.profile.difficulty_preference(),
            Feature::TimeOfDayPref => f64::from(self.profile.time_of_day_preference().index()),
            Feature::SessionDuration => self.candidate.session_duration,
            Feature::SubjectDifficulty => self.candidate.subject_difficulty,
            Feature::BreakFrequency => self.candidate.break_frequency,
        }
    }
}

/// A scored and labelled candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub session_duration: f64,
    pub subject_difficulty: f64,
    pub break_frequency: f64,
    /// Mean of the tree and linear predictions
    pub predicted_performance: f64,
    pub optimal_time: String,
    pub tree_prediction: f64,
    pub linear_prediction: f64,
}

/// Score every grid candidate for `profile`, in grid order.
///
/// # Errors
///
/// Returns [`ModelError::NotTrained`] if `models` is incomplete.
pub fn score_candidates(profile: &UserProfile, models: &TrainedModelSet) -> Result<Vec<Recommendation>> {
    models.ensure_complete()?;

    let grid = candidate_grid();
    let inputs: Vec<ScoringInput<'_>> = grid
        .iter()
        .map(|candidate| ScoringInput { profile, candidate })
        .collect();

    let raw = models.schema().matrix(&inputs);
    let scaled = models.scaler().transform(&raw)?;

    let members = models.members();
    let mut per_model: Vec<Vec<f64>> = Vec::with_capacity(members.len());
    for member in &members {
        let input = match member.input {
            InputSpace::Raw => &raw,
            InputSpace::Scaled => &scaled,
        };
        per_model.push(member.regressor.predict(input)?);
    }

    let optimal_time = time::label(i64::from(profile.time_of_day_preference().index()));
    let n_models = per_model.len() as f64;

    Ok(grid
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let blended = per_model.iter().map(|preds| preds[i]).sum::<f64>() / n_models;
            Recommendation {
                session_duration: candidate.session_duration,
                subject_difficulty: candidate.subject_difficulty,
                break_frequency: candidate.break_frequency,
                predicted_performance: blended,
                optimal_time: optimal_time.to_string(),
                tree_prediction: per_model[0][i],
                linear_prediction: per_model[1][i],
            }
        })
        .collect())
}

/// Stable descending sort by blended score, truncated to `top_k`.
pub fn rank(mut scored: Vec<Recommendation>, top_k: usize) -> Vec<Recommendation> {
    scored.sort_by(|a, b| b.predicted_performance.total_cmp(&a.predicted_performance));
    scored.truncate(top_k);
    scored
}

/// Top `top_k` session configurations for `profile`, best first.
///
/// Returns `min(top_k, GRID_SIZE)` entries.
///
/// # Errors
///
/// Returns a validation error for `top_k == 0` and
/// [`ModelError::NotTrained`] for an incomplete model set.
pub fn recommend(
    profile: &UserProfile,
    models: &TrainedModelSet,
    top_k: usize,
) -> Result<Vec<Recommendation>> {
    if top_k == 0 {
        return Err(ValidationError::invalid("top_k", "must be at least 1").into());
    }
    let scored = score_candidates(profile, models)?;
    let ranked = rank(scored, top_k);
    if let Some(best) = ranked.first() {
        tracing::debug!(
            returned = ranked.len(),
            best = best.predicted_performance,
            "ranked recommendations"
        );
    }
    Ok(ranked)
}

/// Holds a shared model set and answers recommendation requests.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    models: Option<Arc<TrainedModelSet>>,
    top_k: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self {
            models: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RecommendationEngine {
    /// An engine with no models; `recommend` fails until models are installed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(models: Arc<TrainedModelSet>) -> Self {
        Self {
            models: Some(models),
            ..Self::default()
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Replace the model set used for future requests.
    pub fn install(&mut self, models: Arc<TrainedModelSet>) {
        self.models = Some(models);
    }

    pub fn models(&self) -> Option<&Arc<TrainedModelSet>> {
        self.models.as_ref()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Recommend using the engine's default `top_k`.
    pub fn recommend(&self, profile: &UserProfile) -> Result<Vec<Recommendation>> {
        self.recommend_top(profile, self.top_k)
    }

    pub fn recommend_top(&self, profile: &UserProfile, top_k: usize) -> Result<Vec<Recommendation>> {
        let models = self
            .models
            .as_deref()
            .ok_or_else(|| ModelError::NotTrained("no model set installed".into()))?;
        recommend(profile, models, top_k)
    }
}
