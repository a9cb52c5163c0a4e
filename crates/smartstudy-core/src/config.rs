//! TOML-based application configuration.
//!
//! Stores:
//! - Training parameters (sample count, seed, split, tree limits)
//! - Recommendation size
//! - Default learner profile
//!
//! The core only parses and serializes; locating and reading the file is the
//! caller's job.

use serde::{Deserialize, Serialize};

use crate::engine::DEFAULT_TOP_K;
use crate::error::ConfigError;
use crate::model::TreeParams;
use crate::profile::ProfileOverrides;
use crate::trainer::TrainerConfig;

/// Training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
}

/// Recommendation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    /// Profile fields used when the caller does not supply them.
    #[serde(default)]
    pub profile: ProfileOverrides,
}

// Default functions
fn default_n_samples() -> usize {
    1000
}
fn default_seed() -> u64 {
    42
}
fn default_test_fraction() -> f64 {
    0.2
}
fn default_max_depth() -> usize {
    10
}
fn default_min_samples_split() -> usize {
    2
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_samples: default_n_samples(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            max_depth: default_max_depth(),
            min_samples_split: default_min_samples_split(),
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl TrainingConfig {
    pub fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            test_fraction: self.test_fraction,
            tree: TreeParams {
                max_depth: self.max_depth,
                min_samples_split: self.min_samples_split,
            },
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Parse a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for malformed TOML or wrongly
    /// typed values, and [`ConfigError::InvalidValue`] for values the
    /// trainer would reject.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that would fail later in training or ranking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.training
            .trainer_config()
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "training".into(),
                message: e.to_string(),
            })?;
        if self.training.n_samples == 0 {
            return Err(ConfigError::InvalidValue {
                key: "training.n_samples".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.recommend.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                key: "recommend.top_k".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.training.n_samples, 1000);
        assert_eq!(cfg.training.seed, 42);
        assert_eq!(cfg.training.test_fraction, 0.2);
        assert_eq!(cfg.training.max_depth, 10);
        assert_eq!(cfg.recommend.top_k, 5);
        assert_eq!(cfg.profile, ProfileOverrides::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [training]
            seed = 7

            [profile]
            preferred_study_hours = 5.5
            time_of_day_preference = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.training.seed, 7);
        assert_eq!(cfg.training.n_samples, 1000);
        assert_eq!(cfg.profile.preferred_study_hours, Some(5.5));
        assert_eq!(cfg.profile.difficulty_preference, None);
        assert_eq!(cfg.profile.time_of_day_preference, Some(2));
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = cfg.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.training.seed, cfg.training.seed);
        assert_eq!(parsed.recommend.top_k, cfg.recommend.top_k);
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = Config::from_toml_str("[training]\nseed = \"abc\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[training]\ntest_fraction = 1.5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml_str("[recommend]\ntop_k = 0"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("training.seed").as_deref(), Some("42"));
        assert_eq!(cfg.get("recommend.top_k").as_deref(), Some("5"));
        assert!(cfg.get("training.missing").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn trainer_config_mirrors_training_section() {
        let cfg = TrainingConfig {
            max_depth: 4,
            ..TrainingConfig::default()
        };
        let trainer = cfg.trainer_config();
        assert_eq!(trainer.tree.max_depth, 4);
        assert_eq!(trainer.test_fraction, 0.2);
    }
}
