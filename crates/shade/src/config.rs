//! Controller configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config:
//!
//! ```rust
//! let config = shade::ShadeConfig::from_yaml(r#"
//! storage_key: site-theme
//! scheme_attribute: data-color-scheme
//! "#).unwrap();
//!
//! assert_eq!(config.storage_key, "site-theme");
//! assert!(config.store_path.is_none());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::storage::DEFAULT_STORAGE_KEY;
use crate::view::DEFAULT_SCHEME_ATTRIBUTE;

/// Environment variable overriding [`ShadeConfig::storage_key`].
pub const ENV_STORAGE_KEY: &str = "SHADE_STORAGE_KEY";
/// Environment variable overriding [`ShadeConfig::scheme_attribute`].
pub const ENV_SCHEME_ATTRIBUTE: &str = "SHADE_SCHEME_ATTRIBUTE";
/// Environment variable overriding [`ShadeConfig::store_path`].
pub const ENV_STORE: &str = "SHADE_STORE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadeConfig {
    /// Storage key holding the persisted choice.
    pub storage_key: String,
    /// Root attribute that receives the color-scheme hint.
    pub scheme_attribute: String,
    /// Location of the file store, when one is used.
    pub store_path: Option<PathBuf>,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            scheme_attribute: DEFAULT_SCHEME_ATTRIBUTE.to_string(),
            store_path: None,
        }
    }
}

impl ShadeConfig {
    /// Parses and validates a YAML config.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML config file.
    ///
    /// A relative `store_path` is resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let (Some(store), Some(dir)) = (config.store_path.as_ref(), path.parent()) {
            if store.is_relative() {
                config.store_path = Some(dir.join(store));
            }
        }
        Ok(config)
    }

    /// Applies `SHADE_*` overrides read through `lookup`.
    ///
    /// Empty values are ignored. Pass `|name| std::env::var(name).ok()` for
    /// the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(key) = read(ENV_STORAGE_KEY) {
            self.storage_key = key;
        }
        if let Some(attribute) = read(ENV_SCHEME_ATTRIBUTE) {
            self.scheme_attribute = attribute;
        }
        if let Some(store) = read(ENV_STORE) {
            self.store_path = Some(PathBuf::from(store));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        if self.scheme_attribute.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "scheme_attribute must not be empty".into(),
            ));
        }
        Ok(())
    }
}
