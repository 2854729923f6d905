//! Configuration file loading for the tournament director.
//!
//! Settings live in a TOML file, `swiss.toml` by default. Every key is
//! optional; a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swiss_engine::{RematchPolicy, SwissPairing, Tiebreak};
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

/// Pairing settings.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingConfig {
    /// What to do when only past opponents are left. Defaults to `allow`.
    #[serde(default)]
    pub rematch_policy: RematchPolicy,
}

/// Standings settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StandingsConfig {
    /// Tiebreaks applied after score, in order.
    #[serde(default = "default_tiebreaks")]
    pub tiebreaks: Vec<Tiebreak>,
}

impl Default for StandingsConfig {
    fn default() -> Self {
        StandingsConfig {
            tiebreaks: default_tiebreaks(),
        }
    }
}

fn default_tiebreaks() -> Vec<Tiebreak> {
    Tiebreak::DEFAULT_ORDER.to_vec()
}

/// Main director configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DirectorConfig {
    /// Tournament state file used when `--state` is not given.
    /// Defaults to `tournament.json`.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    #[serde(default)]
    pub pairing: PairingConfig,
    #[serde(default)]
    pub standings: StandingsConfig,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("tournament.json")
}

impl Default for DirectorConfig {
    fn default() -> Self {
        DirectorConfig {
            state_path: default_state_path(),
            pairing: PairingConfig::default(),
            standings: StandingsConfig::default(),
        }
    }
}

impl DirectorConfig {
    /// Loads the configuration at `path`.
    ///
    /// Returns the default configuration if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("swiss.toml")
    }

    /// The pairing system described by this configuration.
    pub fn pairing_system(&self) -> SwissPairing {
        SwissPairing::new(self.pairing.rematch_policy)
    }
}
