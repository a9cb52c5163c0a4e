//! Locating and reading the configuration file.

use std::path::{Path, PathBuf};

use smartstudy_core::{Config, ConfigError};

/// Effective configuration and where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when built-in defaults are in effect.
    pub source: Option<PathBuf>,
}

/// `~/.config/smartstudy/config.toml`, falling back to the working directory
/// when no home directory is known.
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("smartstudy")
        .join("config.toml")
}

/// Load `explicit` if given, else the default path if it exists, else defaults.
///
/// An explicitly named file must exist.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = default_path();
            if path.is_file() {
                read(&path)
            } else {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(LoadedConfig {
                    config: Config::default(),
                    source: None,
                })
            }
        }
    }
}

fn read(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let config = Config::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(LoadedConfig {
        config,
        source: Some(path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[training]\nseed = 99\n\n[recommend]\ntop_k = 3").unwrap();

        let loaded = load(Some(file.path())).unwrap();
        assert_eq!(loaded.config.training.seed, 99);
        assert_eq!(loaded.config.recommend.top_k, 3);
        assert_eq!(loaded.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn missing_explicit_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[training\nseed = ").unwrap();
        assert!(matches!(
            load(Some(file.path())),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        let path = default_path();
        assert!(path.ends_with(".config/smartstudy/config.toml"));
    }
}
