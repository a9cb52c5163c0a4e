use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "smartstudy", version, about = "SmartStudy session recommendations")]
struct Cli {
    /// Configuration file (default: ~/.config/smartstudy/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both models on synthetic data and report accuracy
    Train(commands::train::TrainArgs),
    /// Rank study-session configurations for a learner
    Recommend(commands::recommend::RecommendArgs),
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = settings::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Train(args) => commands::train::run(args, &loaded.config),
        Commands::Recommend(args) => commands::recommend::run(args, &loaded.config),
        Commands::Config { action } => commands::config::run(action, &loaded),
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
