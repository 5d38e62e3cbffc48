//! TOML configuration file.
//!
//! ```toml
//! [limits]
//! hud-card = 5
//! context-badge = 8
//! ```
//!
//! Every key is optional. Unknown keys are rejected. The binary never calls a
//! generator, so the retry budget is not configurable here; library callers
//! pass `GenerationOptions` to the retry loop directly.

use std::path::{Path, PathBuf};

use hudkit_registry::LimitsConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("invalid configuration in {path}: {error}")]
	Parse { path: PathBuf, error: toml::de::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub limits: LimitsConfig,
}

impl Config {
	/// `$XDG_CONFIG_HOME/hudkit/config.toml` or the platform equivalent.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("hudkit").join("config.toml"))
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_owned(),
			error,
		})?;
		toml::from_str(&text).map_err(|error| ConfigError::Parse {
			path: path.to_owned(),
			error,
		})
	}

	/// Loads an explicit path, else the default path if it exists, else defaults.
	pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		match Self::default_path() {
			Some(path) if path.is_file() => Self::load(&path),
			_ => Ok(Self::default()),
		}
	}
}
