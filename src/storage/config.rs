//! Configuration handling for Friday
//!
//! Configuration is read from an explicit `--config` file, or from
//! `config.toml` in the platform config directory
//! (e.g. `~/.config/friday/config.toml`). Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task file location, relative paths resolve against the working directory
    pub data_file: PathBuf,

    /// Name the assistant introduces itself with
    pub name: String,

    /// Width of the underscore divider framing each response
    pub divider_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data").join("tasklist.txt"),
            name: "Friday".to_string(),
            divider_width: 60,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from the global location
    ///
    /// An explicit path must exist; the global file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::global_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "friday", "friday").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Reads and validates a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parses and validates TOML config text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_file must not be empty".into()));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".into()));
        }
        if self.divider_width == 0 {
            return Err(ConfigError::Invalid(
                "divider_width must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
