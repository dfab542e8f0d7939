//! Error types for storage, configuration and parsing.
//!
//! None of these escape the controller: the no-throw contract of
//! [`ThemeController`](crate::ThemeController) means storage failures are
//! logged and dropped at that boundary. They are public so that stores and
//! front ends can report them.

use std::io;

/// Errors raised by a [`PreferenceStore`](crate::PreferenceStore).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled or inaccessible.
    #[error("preference storage is unavailable")]
    Unavailable,

    /// A write was refused.
    #[error("storage quota exceeded while writing '{key}'")]
    QuotaExceeded { key: String },

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage content is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn quota(key: impl Into<String>) -> Self {
        Self::QuotaExceeded { key: key.into() }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Corrupt(err.to_string())
    }
}

/// Errors raised while loading a [`ShadeConfig`](crate::ShadeConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Returned by the strict [`FromStr`](std::str::FromStr) impl of
/// [`ThemeChoice`](crate::ThemeChoice).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme choice '{0}' (expected light, dark or system)")]
pub struct ParseChoiceError(pub String);
