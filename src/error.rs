//! Centralized error types for the tagpick host.
//!
//! The picker engines themselves never fail: unmatched input is rolled back
//! and duplicates are ignored. Errors only come from loading configuration
//! and driving the terminal.

use thiserror::Error;

use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal-related errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read a configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::ParseError(err) => {
                    format!("A configuration file is invalid: {}", err.message())
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error prevents the host from starting.
    pub fn is_critical(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::Terminal(_))
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
        assert!(app_err.is_critical());
    }

    #[test]
    fn test_user_message_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "control name 'a' is used more than once".to_string(),
        ));
        let msg = err.user_message();
        assert!(msg.starts_with("Configuration error"));
        assert!(msg.contains("more than once"));
    }

    #[test]
    fn test_user_message_parse_error() {
        let parse_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err = AppError::Config(ConfigError::ParseError(parse_err));
        assert!(err.user_message().contains("invalid"));
    }

    #[test]
    fn test_io_error_not_critical() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!err.is_critical());
        assert!(err.user_message().contains("file operation"));
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("test error");
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.user_message(), "Terminal error: test error");
    }

    #[test]
    fn test_other_error() {
        let err = AppError::other("something went wrong");
        assert_eq!(err.user_message(), "something went wrong");
    }
}
