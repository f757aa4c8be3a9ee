//! Reader and validation settings for badge models.
//!
//! Stored as camelCase JSON, e.g.:
//!
//! ```json
//! { "pairing": "byName", "validateTagShapes": false }
//! ```
//!
//! Missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How profile badge `a`/`e` tags are matched up when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PairingMode {
    /// An `a` pairs only with the `e` directly after it; strays are dropped
    #[default]
    Strict,
    /// The n-th `a` pairs with the n-th `e`, wherever they sit
    ByName,
}

/// Badge model configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nip58Config {
    /// Pairing policy for profile badges
    #[serde(default)]
    pub pairing: PairingMode,

    /// Check argument counts of known tags during validation
    #[serde(default = "default_true")]
    pub validate_tag_shapes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Nip58Config {
    fn default() -> Self {
        Self {
            pairing: PairingMode::Strict,
            validate_tag_shapes: true,
        }
    }
}

impl Nip58Config {
    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Nip58Config, ConfigError> {
    let path = path.as_ref();
    debug!("Loading badge config from {}", path.display());
    let json = fs::read_to_string(path)?;
    Nip58Config::from_json(&json)
}

/// Write configuration to a JSON file, replacing any existing one.
pub fn save_config(path: impl AsRef<Path>, config: &Nip58Config) -> Result<(), ConfigError> {
    let path = path.as_ref();
    debug!("Saving badge config to {}", path.display());
    fs::write(path, config.to_json()?)?;
    Ok(())
}
