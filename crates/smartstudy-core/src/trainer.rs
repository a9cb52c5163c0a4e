//! Training pipeline: split, scale, fit both regressors, score on held-out data.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, ModelError, Result, ValidationError};
use crate::features::{FeatureMatrix, FeatureSchema};
use crate::model::metrics::mean_absolute_error;
use crate::model::{
    r2_score, DecisionTreeRegressor, InputSpace, LinearRegressor, Regressor, StandardScaler,
    TreeParams,
};
use crate::synth::{self, StudySample};

/// Hyperparameters for [`ModelTrainer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Share of samples held out for scoring
    pub test_fraction: f64,
    pub tree: TreeParams,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            tree: TreeParams::default(),
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ValidationError::invalid(
                "test_fraction",
                format!("must be in (0, 1), got {}", self.test_fraction),
            ));
        }
        if self.tree.min_samples_split < 2 {
            return Err(ValidationError::invalid(
                "min_samples_split",
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// Ordered collection of labelled samples awaiting a train/test split.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    samples: Vec<StudySample>,
}

impl TrainingSet {
    pub fn new(samples: Vec<StudySample>) -> Self {
        Self { samples }
    }

    /// Synthesize `n_samples` rows from `rng`.
    pub fn generate<R: Rng + ?Sized>(n_samples: usize, rng: &mut R) -> Result<Self, DataError> {
        synth::generate(n_samples, rng).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[StudySample] {
        &self.samples
    }

    /// Shuffle with `rng` and cut into `(train, test)`.
    ///
    /// The test partition holds `ceil(test_fraction * n)` samples.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InsufficientSamples`] if either side would be empty.
    pub fn split<R: Rng + ?Sized>(
        self,
        test_fraction: f64,
        rng: &mut R,
    ) -> Result<(Vec<StudySample>, Vec<StudySample>), DataError> {
        let total = self.samples.len();
        let test = ((total as f64) * test_fraction).ceil() as usize;
        let train = total.saturating_sub(test);
        if train == 0 || test == 0 {
            return Err(DataError::InsufficientSamples { total, train, test });
        }

        let mut samples = self.samples;
        samples.shuffle(rng);
        let train_part = samples.split_off(test);
        Ok((train_part, samples))
    }
}

/// Held-out evaluation of both models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub tree_r2: f64,
    pub linear_r2: f64,
    pub tree_mae: f64,
    pub linear_mae: f64,
    pub n_train: usize,
    pub n_test: usize,
}

/// A regressor together with the input representation it was fitted on.
#[derive(Clone, Copy)]
pub struct ModelMember<'a> {
    pub regressor: &'a dyn Regressor,
    pub input: InputSpace,
}

/// Immutable output of training.
///
/// Holds the scaler, both regressors, and the feature schema they were
/// fitted with. Safe to share behind an `Arc` across threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainedModelSet {
    schema: FeatureSchema,
    scaler: StandardScaler,
    tree: DecisionTreeRegressor,
    linear: LinearRegressor,
    scores: ModelScores,
}

impl TrainedModelSet {
    /// Assemble a model set from already-fitted parts.
    pub fn from_parts(
        schema: FeatureSchema,
        scaler: StandardScaler,
        tree: DecisionTreeRegressor,
        linear: LinearRegressor,
        scores: ModelScores,
    ) -> Self {
        Self {
            schema,
            scaler,
            tree,
            linear,
            scores,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn feature_names(&self) -> Vec<&'static str> {
        self.schema.names()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn tree(&self) -> &DecisionTreeRegressor {
        &self.tree
    }

    pub fn linear(&self) -> &LinearRegressor {
        &self.linear
    }

    pub fn scores(&self) -> &ModelScores {
        &self.scores
    }

    pub fn tree_r2(&self) -> f64 {
        self.scores.tree_r2
    }

    pub fn linear_r2(&self) -> f64 {
        self.scores.linear_r2
    }

    /// Both regressors, tree first.
    pub fn members(&self) -> [ModelMember<'_>; 2] {
        [
            ModelMember {
                regressor: &self.tree,
                input: InputSpace::Raw,
            },
            ModelMember {
                regressor: &self.linear,
                input: InputSpace::Scaled,
            },
        ]
    }

    /// Check that every part needed for inference is present and consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotTrained`] naming the first missing part.
    pub fn ensure_complete(&self) -> Result<(), ModelError> {
        if !self.schema.is_complete() {
            return Err(ModelError::NotTrained(format!(
                "feature schema is incomplete: {:?}",
                self.schema.names()
            )));
        }
        if !self.scaler.is_fitted() || self.scaler.means().len() != self.schema.len() {
            return Err(ModelError::NotTrained("scaler is missing or mis-sized".into()));
        }
        for member in self.members() {
            if !member.regressor.is_fitted() {
                return Err(ModelError::NotTrained(format!(
                    "{} has not been fitted",
                    member.regressor.name()
                )));
            }
        }
        Ok(())
    }
}

struct Partition {
    raw: FeatureMatrix,
    targets: Vec<f64>,
}

impl Partition {
    fn new(schema: &FeatureSchema, samples: &[StudySample]) -> Self {
        Self {
            raw: schema.matrix(samples),
            targets: samples.iter().map(|s| s.performance).collect(),
        }
    }
}

/// Fits the scaler and both regressors.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
    schema: FeatureSchema,
}

impl ModelTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrainerConfig) -> Self {
        Self {
            config,
            schema: FeatureSchema::default(),
        }
    }

    /// Train with a non-default feature order.
    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Split `set`, fit all models on the train partition, score on the rest.
    ///
    /// # Errors
    ///
    /// Returns a data error when the set is too small to split, the train
    /// targets have fewer than two distinct values, or the linear system is
    /// singular. Returns a validation error for a bad [`TrainerConfig`].
    pub fn train<R: Rng + ?Sized>(&self, set: TrainingSet, rng: &mut R) -> Result<TrainedModelSet> {
        self.config.validate()?;
        if set.is_empty() {
            return Err(DataError::EmptySampleSet.into());
        }

        let (train_samples, test_samples) = set.split(self.config.test_fraction, rng)?;
        tracing::info!(
            n_train = train_samples.len(),
            n_test = test_samples.len(),
            "split training set"
        );

        let distinct = distinct_count(train_samples.iter().map(|s| s.performance));
        if distinct < 2 {
            return Err(DataError::DegenerateTarget { distinct }.into());
        }

        let train = Partition::new(&self.schema, &train_samples);
        let test = Partition::new(&self.schema, &test_samples);

        let mut scaler = StandardScaler::new();
        let train_scaled = scaler.fit_transform(&train.raw)?;
        let test_scaled = scaler.transform(&test.raw)?;

        let mut tree = DecisionTreeRegressor::new(self.config.tree);
        let mut linear = LinearRegressor::new();

        let (tree_r2, tree_mae) = fit_and_score(
            &mut tree,
            (&train.raw, train.targets.as_slice()),
            (&test.raw, test.targets.as_slice()),
        )?;
        let (linear_r2, linear_mae) = fit_and_score(
            &mut linear,
            (&train_scaled, train.targets.as_slice()),
            (&test_scaled, test.targets.as_slice()),
        )?;

        tracing::info!(tree_r2, linear_r2, "trained model set");

        Ok(TrainedModelSet {
            schema: self.schema.clone(),
            scaler,
            tree,
            linear,
            scores: ModelScores {
                tree_r2,
                linear_r2,
                tree_mae,
                linear_mae,
                n_train: train_samples.len(),
                n_test: test_samples.len(),
            },
        })
    }

    /// Synthesize `n_samples` rows and train, all from one seeded generator.
    pub fn train_synthetic(&self, n_samples: usize, seed: u64) -> Result<TrainedModelSet> {
        let mut rng = Mcg128Xsl64::seed_from_u64(seed);
        let set = TrainingSet::generate(n_samples, &mut rng)?;
        self.train(set, &mut rng)
    }
}

/// Synthesize `n_samples` rows from `seed` and train with default settings.
///
/// # Errors
///
/// Fails with a data error for zero samples or unusable training data.
pub fn train(n_samples: usize, seed: u64) -> Result<TrainedModelSet> {
    ModelTrainer::new().train_synthetic(n_samples, seed)
}

fn fit_and_score(
    model: &mut dyn Regressor,
    (train_x, train_y): (&FeatureMatrix, &[f64]),
    (test_x, test_y): (&FeatureMatrix, &[f64]),
) -> Result<(f64, f64)> {
    model.fit(train_x, train_y)?;
    let predicted = model.predict(test_x)?;
    let r2 = r2_score(test_y, &predicted)?;
    let mae = mean_absolute_error(test_y, &predicted)?;
    tracing::debug!(model = model.name(), r2, mae, "scored on held-out partition");
    Ok((r2, mae))
}

fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    fn constant_sample(performance: f64, hours: f64) -> StudySample {
        StudySample {
            study_hours_per_day: hours,
            difficulty_preference: 0.5,
            time_of_day_pref: 1,
            session_duration: 1.0,
            subject_difficulty: 0.5,
            break_frequency: 0.2,
            performance,
        }
    }

    #[test]
    fn split_is_eighty_twenty() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let set = TrainingSet::generate(1000, &mut rng).unwrap();
        let (train, test) = set.split(0.2, &mut rng).unwrap();
        assert_eq!(train.len(), 800);
        assert_eq!(test.len(), 200);
    }

    #[test]
    fn split_rounds_test_size_up() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let set = TrainingSet::generate(7, &mut rng).unwrap();
        let (train, test) = set.split(0.2, &mut rng).unwrap();
        assert_eq!((train.len(), test.len()), (5, 2));
    }

    #[test]
    fn split_keeps_every_sample() {
        let mut rng = Mcg128Xsl64::seed_from_u64(9);
        let set = TrainingSet::generate(20, &mut rng).unwrap();
        let original = set.samples().to_vec();
        let (train, test) = set.split(0.2, &mut rng).unwrap();
        let mut all: Vec<StudySample> = train.into_iter().chain(test).collect();
        assert_eq!(all.len(), original.len());
        for s in &original {
            let pos = all.iter().position(|x| x == s).unwrap();
            all.remove(pos);
        }
        assert!(all.is_empty());
    }

    #[test]
    fn single_sample_cannot_be_split() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let err = ModelTrainer::new()
            .train(TrainingSet::new(vec![constant_sample(0.5, 3.0)]), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::CoreError::Data(DataError::InsufficientSamples { total: 1, .. })
        ));
    }

    #[test]
    fn constant_targets_are_degenerate() {
        let samples: Vec<_> = (0..10).map(|i| constant_sample(1.0, 2.0 + i as f64)).collect();
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let err = ModelTrainer::new()
            .train(TrainingSet::new(samples), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::CoreError::Data(DataError::DegenerateTarget { distinct: 1 })
        ));
    }

    #[test]
    fn zero_samples_is_a_data_error() {
        assert!(matches!(
            train(0, 42),
            Err(crate::CoreError::Data(DataError::EmptySampleSet))
        ));
    }

    #[test]
    fn invalid_test_fraction_is_rejected() {
        let trainer = ModelTrainer::with_config(TrainerConfig {
            test_fraction: 1.0,
            ..TrainerConfig::default()
        });
        assert_eq!(trainer.config().test_fraction, 1.0);
        assert!(matches!(
            trainer.train_synthetic(100, 1),
            Err(crate::CoreError::Validation(_))
        ));
    }

    #[test]
    fn trained_set_is_complete_and_scored() {
        let models = train(500, 5).unwrap();
        models.ensure_complete().unwrap();
        assert_eq!(models.scores().n_train, 400);
        assert_eq!(models.scores().n_test, 100);
        assert!(models.tree_r2().is_finite());
        assert!(models.linear_r2().is_finite());
        assert!(models.tree().depth() <= 10);
        assert_eq!(models.feature_names()[0], "study_hours_per_day");
    }

    #[test]
    fn custom_schema_is_recorded() {
        let mut order = Feature::ALL.to_vec();
        order.reverse();
        let models = ModelTrainer::new()
            .with_schema(FeatureSchema::new(order.clone()))
            .train_synthetic(200, 3)
            .unwrap();
        assert_eq!(models.schema().features(), order.as_slice());
    }

    #[test]
    fn incomplete_set_is_reported() {
        let models = TrainedModelSet::from_parts(
            FeatureSchema::default(),
            StandardScaler::identity(6),
            DecisionTreeRegressor::default(),
            LinearRegressor::from_coefficients(0.0, vec![0.0; 6]),
            ModelScores::default(),
        );
        assert!(matches!(
            models.ensure_complete(),
            Err(ModelError::NotTrained(msg)) if msg.contains("decision_tree")
        ));
    }

    #[test]
    fn model_set_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrainedModelSet>();
    }

    #[test]
    fn malformed_tree_fails_completeness_check() {
        let tree: DecisionTreeRegressor = serde_json::from_str(
            r#"{
                "params": {"max_depth": 10, "min_samples_split": 2},
                "n_features": 6,
                "nodes": [{"Split": {"feature_idx": 0, "threshold": 1.0, "left": 4, "right": 5}}]
            }"#,
        )
        .unwrap();
        let models = TrainedModelSet::from_parts(
            FeatureSchema::default(),
            StandardScaler::identity(6),
            tree,
            LinearRegressor::from_coefficients(0.0, vec![0.0; 6]),
            ModelScores::default(),
        );
        assert!(matches!(
            models.ensure_complete(),
            Err(ModelError::NotTrained(msg)) if msg.contains("decision_tree")
        ));
    }
}
