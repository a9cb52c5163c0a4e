//! # SmartStudy Core Library
//!
//! Personalized study-session recommendations from two regression models
//! trained on synthetic behavioural data.
//!
//! ## Architecture
//!
//! - **Synthesis**: seeded generation of labelled study samples
//! - **Training**: 80/20 split, z-score scaling, a bounded-depth regression
//!   tree on raw features and least squares on scaled features
//! - **Recommendation**: a fixed 36-point grid of session configurations,
//!   scored by both models, blended, and ranked with a stable sort
//!
//! The library is pure and synchronous. It performs no I/O and reads no
//! environment variables. A [`TrainedModelSet`] is immutable and may be
//! shared across threads.
//!
//! ## Key Components
//!
//! - [`train`]: synthesize and fit from a sample count and seed
//! - [`recommend`]: rank grid candidates for a [`UserProfile`]
//! - [`Regressor`]: trait implemented by both models
//! - [`Config`]: TOML configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod profile;
pub mod synth;
pub mod time;
pub mod trainer;

pub use config::Config;
pub use engine::{recommend, Candidate, Recommendation, RecommendationEngine, GRID_SIZE};
pub use error::{ConfigError, CoreError, DataError, ModelError, Result, ValidationError};
pub use features::{Feature, FeatureMatrix, FeatureSchema};
pub use model::{
    DecisionTreeRegressor, InputSpace, LinearRegressor, Regressor, StandardScaler, TreeParams,
};
pub use profile::{ProfileOverrides, UserProfile};
pub use synth::StudySample;
pub use time::TimeOfDay;
pub use trainer::{train, ModelScores, ModelTrainer, TrainedModelSet, TrainerConfig, TrainingSet};
