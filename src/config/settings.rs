//! Host settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::{config_dir, load_toml, ConfigError, Result};
use crate::engine::EngineOptions;

/// Host-wide settings.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Delay between a picker losing focus and its reconciliation.
    pub settle_delay_ms: u64,
    /// Number of suggestion rows shown at once.
    pub max_visible_items: usize,
    /// Separator characters for tag inputs that declare none.
    pub default_separators: Vec<String>,
    /// Event loop tick rate.
    pub tick_rate_ms: u64,
    /// The UI theme to use.
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 150,
            max_visible_items: 8,
            default_separators: vec![",".to_string()],
            tick_rate_ms: 50,
            theme: "dark".to_string(),
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load settings from `path`, or from the default location.
    ///
    /// A missing file at the default location yields defaults. An explicit
    /// path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };
        if !explicit && !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let settings: Settings = load_toml(&path)?;
        settings.validate()?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if a separator is not exactly
    /// one character or the list height is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_visible_items == 0 {
            return Err(ConfigError::ValidationError(
                "max_visible_items must be at least 1".to_string(),
            ));
        }
        parse_separators(&self.default_separators)?;
        Ok(())
    }

    /// The settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Engine options derived from these settings.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            allow_new: false,
            separators: parse_separators(&self.default_separators).unwrap_or_default(),
            settle_delay: self.settle_delay(),
            max_visible: self.max_visible_items,
        }
    }
}

/// Turn one-character strings into separator characters.
pub(crate) fn parse_separators(separators: &[String]) -> Result<Vec<char>> {
    separators
        .iter()
        .map(|separator| {
            let mut chars = separator.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(ConfigError::ValidationError(format!(
                    "separator '{}' must be a single character",
                    separator
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.settle_delay(), Duration::from_millis(150));
        assert_eq!(settings.engine_options().separators, vec![',']);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = toml::from_str("settle_delay_ms = 300").unwrap();
        assert_eq!(settings.settle_delay_ms, 300);
        assert_eq!(settings.max_visible_items, 8);
        assert_eq!(settings.theme, "dark");
    }

    #[test]
    fn test_multi_char_separator_rejected() {
        let settings = Settings {
            default_separators: vec![";;".to_string()],
            ..Settings::default()
        };
        let result = settings.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("single character"));
    }

    #[test]
    fn test_zero_visible_items_rejected() {
        let settings = Settings {
            max_visible_items: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "settle_delay_ms = 80\ndefault_separators = [\",\", \";\"]\ntheme = \"light\"\n",
        )
        .unwrap();

        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(
            loaded,
            Settings {
                settle_delay_ms: 80,
                default_separators: vec![",".to_string(), ";".to_string()],
                theme: "light".to_string(),
                ..Settings::default()
            }
        );
        assert_eq!(loaded.engine_options().separators, vec![',', ';']);
    }

    #[test]
    fn test_load_rejects_invalid_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_separators = [\"ab\"]").unwrap();
        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "settle_delay_ms = \"soon\"").unwrap();
        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
