//! Configuration management for tagpick.
//!
//! This module handles loading host settings and the form files that
//! declare which controls to mount.

mod form;
mod settings;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use form::{ControlSpec, FormSpec};
pub use settings::Settings;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// A configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// A configuration file is not valid TOML for its schema.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Directory holding tagpick's own configuration.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("tagpick"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Read and parse a TOML file.
fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    Ok(toml::from_str(&content)?)
}
