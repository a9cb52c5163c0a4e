pub mod config;
pub mod recommend;
pub mod train;

use clap::Args;
use smartstudy_core::config::TrainingConfig;
use smartstudy_core::{ModelTrainer, TrainedModelSet};

/// Synthetic training options shared by `train` and `recommend`.
#[derive(Args, Debug, Clone, Default)]
pub struct TrainingOpts {
    /// Number of synthetic samples (default from config)
    #[arg(long, value_name = "N")]
    pub samples: Option<usize>,
    /// Random seed (default from config)
    #[arg(long, value_name = "S")]
    pub seed: Option<u64>,
}

impl TrainingOpts {
    /// Train with the config's hyperparameters and any flag overrides.
    pub fn train(&self, training: &TrainingConfig) -> smartstudy_core::Result<TrainedModelSet> {
        let n_samples = self.samples.unwrap_or(training.n_samples);
        let seed = self.seed.unwrap_or(training.seed);
        tracing::debug!(n_samples, seed, "training in-process");
        ModelTrainer::with_config(training.trainer_config()).train_synthetic(n_samples, seed)
    }
}
