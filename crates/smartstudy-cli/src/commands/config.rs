use clap::Subcommand;

use crate::settings::{self, LoadedConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Get a config value
    Get {
        /// Config key (e.g. "training.seed", "recommend.top_k")
        key: String,
    },
    /// Print the config file path in use
    Path,
}

pub fn run(action: ConfigAction, loaded: &LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&loaded.config)?);
            } else {
                print!("{}", loaded.config.to_toml_string()?);
            }
        }
        ConfigAction::Get { key } => match loaded.config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Path => match &loaded.source {
            Some(path) => println!("{}", path.display()),
            None => println!("{} (not present, using defaults)", settings::default_path().display()),
        },
    }
    Ok(())
}
