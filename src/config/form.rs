//! Form files: the controls a host mounts.
//!
//! ```toml
//! [[control]]
//! name = "fruit"
//! label = "Favourite fruit"
//!
//! [[control.option]]
//! text = "Apple"
//! value = "1"
//! selected = true
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::settings::parse_separators;
use super::{load_toml, ConfigError, Result};
use crate::catalog::SourceOption;

/// One source control declared in a form file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSpec {
    /// Field name used in the submission.
    ///
    /// Must be non-empty and unique within the form.
    pub name: String,

    /// Label shown above the field. Defaults to the name.
    #[serde(default)]
    pub label: Option<String>,

    /// Whether the control asks to be enhanced.
    #[serde(default = "default_true")]
    pub autocomplete: bool,

    /// Tag input instead of a single-value picker.
    #[serde(default)]
    pub multiple: bool,

    /// Accept values that are not among the options.
    #[serde(default)]
    pub allow_new: bool,

    /// Commit characters for tag inputs. `None` falls back to the settings.
    #[serde(default)]
    pub separators: Option<Vec<String>>,

    /// Placeholder shown while the input is empty.
    #[serde(default)]
    pub placeholder: Option<String>,

    /// The declared options.
    #[serde(default, rename = "option")]
    pub options: Vec<SourceOption>,
}

fn default_true() -> bool {
    true
}

impl ControlSpec {
    /// Create a control with a name and no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            autocomplete: true,
            ..Self::default()
        }
    }

    /// Label to display.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Validate this control.
    ///
    /// Checks that:
    /// - The name is non-empty and has no whitespace
    /// - Every separator is a single character
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "control name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "control name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if let Some(separators) = &self.separators {
            parse_separators(separators).map_err(|err| {
                ConfigError::ValidationError(format!("control '{}': {}", self.name, err))
            })?;
        }

        Ok(())
    }

    /// Separator characters declared by this control.
    pub fn separator_chars(&self) -> Option<Vec<char>> {
        self.separators
            .as_ref()
            .and_then(|separators| parse_separators(separators).ok())
    }
}

/// A whole form file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    /// Title shown by the host.
    #[serde(default)]
    pub title: Option<String>,

    /// Controls in display order.
    #[serde(default, rename = "control")]
    pub controls: Vec<ControlSpec>,
}

impl FormSpec {
    /// Load and validate a form file.
    pub fn load(path: &Path) -> Result<Self> {
        let form: FormSpec = load_toml(path)?;
        form.validate()?;
        info!(path = %path.display(), controls = form.controls.len(), "Loaded form");
        Ok(form)
    }

    /// Parse and validate a form from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let form: FormSpec = toml::from_str(content)?;
        form.validate()?;
        Ok(form)
    }

    /// Validate every control and check names are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for control in &self.controls {
            control.validate()?;
            if !seen.insert(control.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "control name '{}' is used more than once",
                    control.name
                )));
            }
        }
        Ok(())
    }
}
