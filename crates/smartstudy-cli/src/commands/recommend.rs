//! Recommend command: train in-process, then rank session configurations.

use std::sync::Arc;

use clap::Args;
use smartstudy_core::{Config, ProfileOverrides, Recommendation, RecommendationEngine};

use super::TrainingOpts;

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Preferred study hours per day
    #[arg(long, value_name = "H")]
    pub hours: Option<f64>,
    /// Difficulty preference in [0, 1]
    #[arg(long, value_name = "D")]
    pub difficulty: Option<f64>,
    /// Time of day (0 = morning, 1 = afternoon, 2 = evening)
    #[arg(long, value_name = "T")]
    pub time: Option<i64>,
    /// Number of recommendations to return
    #[arg(long = "top-k", value_name = "K")]
    pub top_k: Option<usize>,
    #[command(flatten)]
    pub training: TrainingOpts,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RecommendArgs {
    fn overrides(&self) -> ProfileOverrides {
        ProfileOverrides {
            preferred_study_hours: self.hours,
            difficulty_preference: self.difficulty,
            time_of_day_preference: self.time,
        }
    }
}

pub fn run(args: RecommendArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Validate the profile before spending time on training
    let profile = config.profile.merge(args.overrides()).resolve()?;
    let top_k = args.top_k.unwrap_or(config.recommend.top_k);

    let models = args.training.train(&config.training)?;
    let engine = RecommendationEngine::with_models(Arc::new(models)).with_top_k(top_k);
    let recs = engine.recommend(&profile)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }

    print_table(&recs);
    Ok(())
}

fn print_table(recs: &[Recommendation]) {
    if recs.is_empty() {
        println!("No recommendations.");
        return;
    }
    println!(
        "{:<4} {:>8} {:>10} {:>7} {:>11}  {}",
        "#", "Duration", "Difficulty", "Breaks", "Performance", "Best time"
    );
    for (i, rec) in recs.iter().enumerate() {
        println!(
            "{:<4} {:>7.1}h {:>10.1} {:>7.1} {:>11.3}  {}",
            i + 1,
            rec.session_duration,
            rec.subject_difficulty,
            rec.break_frequency,
            rec.predicted_performance,
            rec.optimal_time
        );
    }
}
