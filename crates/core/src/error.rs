//! Error types shared by GearUp services

use thiserror::Error;

/// Errors raised by the shared service plumbing (configuration, bootstrap).
#[derive(Debug, Error)]
pub enum GearupError {
    /// Missing or invalid configuration value
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        /// Environment variable or config key that caused the failure
        key: Option<String>,
    },

    /// Logging subscriber could not be installed
    #[error("Observability error: {0}")]
    ObservabilityError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GearupError {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        GearupError::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// The configuration key this error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            GearupError::ConfigurationError { key, .. } => key.as_deref(),
            _ => None,
        }
    }
}
