//! Configuration file loading for the console.
//!
//! Settings come from `chess.toml` in the working directory, or from the
//! file given with `--config`. Every field is optional.

use chess_engine::{ClockConfig, GameMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Console settings.
///
/// ```toml
/// mode = "local"
///
/// [clock]
/// initial_secs = 300
/// tick_millis = 1000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Mode of the first game. Defaults to local play.
    #[serde(default)]
    pub mode: GameMode,
    /// Clock settings for every game started in this session.
    #[serde(default)]
    pub clock: ClockConfig,
}

impl ConsoleConfig {
    /// Loads the configuration from `path`, or from [`Self::config_path()`]
    /// when no path is given.
    ///
    /// A missing default file yields the default configuration. A missing
    /// file that was asked for explicitly is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the default configuration file path: `chess.toml` in the
    /// current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}
