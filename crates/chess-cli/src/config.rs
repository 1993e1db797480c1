//! Configuration file loading for the chess CLI.
//!
//! Settings live in `chess.toml` in the current directory unless another
//! path is given. Every field is optional.

use chess_rules::PgnTags;
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

/// Default tag values for exported PGN.
///
/// Blank values fall back to the exporter's own defaults.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct PgnConfig {
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub round: String,
    #[serde(default)]
    pub white: String,
    #[serde(default)]
    pub black: String,
}

impl PgnConfig {
    /// Builds export tags dated today.
    pub fn to_tags(&self) -> PgnTags {
        PgnTags {
            event: self.event.clone(),
            site: self.site.clone(),
            date: None,
            round: self.round.clone(),
            white: self.white.clone(),
            black: self.black.clone(),
        }
    }
}

/// Defaults for the `perft` command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PerftConfig {
    /// Search depth when none is given. Defaults to 4.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Worker threads for splitting root moves. Defaults to 1.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_depth() -> u32 {
    4
}

fn default_threads() -> usize {
    1
}

impl Default for PerftConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            threads: default_threads(),
        }
    }
}

/// Main CLI configuration.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ChessConfig {
    #[serde(default)]
    pub pgn: PgnConfig,
    #[serde(default)]
    pub perft: PerftConfig,
}

impl ChessConfig {
    /// Loads the configuration from `path`, or from [`Self::config_path()`]
    /// when no path is given.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map_or_else(Self::config_path, Path::to_path_buf);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration path, `chess.toml` in the current
    /// working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}
