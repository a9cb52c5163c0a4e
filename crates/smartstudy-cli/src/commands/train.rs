//! Train command: fit both models and report held-out accuracy.

use clap::Args;
use smartstudy_core::Config;

use super::TrainingOpts;

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub training: TrainingOpts,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TrainArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let models = args.training.train(&config.training)?;
    let scores = models.scores();

    if args.json {
        println!("{}", serde_json::to_string_pretty(scores)?);
        return Ok(());
    }

    println!("Training samples: {}", scores.n_train);
    println!("Test samples:     {}", scores.n_test);
    println!();
    println!("Decision tree R²: {:.4}  (MAE {:.4})", scores.tree_r2, scores.tree_mae);
    println!("Linear R²:        {:.4}  (MAE {:.4})", scores.linear_r2, scores.linear_mae);
    Ok(())
}
