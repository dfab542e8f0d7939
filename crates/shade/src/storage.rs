//! Persisted theme choice.
//!
//! Storage is a single key-value entry. Only `"light"` and `"dark"` are ever
//! written; `System` is stored as absence. Reading is forgiving: a missing
//! key, an unknown value, or a failing store all mean `System`.
//!
//! Stores implement [`PreferenceStore`]. Two are provided:
//!
//! - [`FileStore`]: a JSON object on disk, the real backend used by the CLI.
//! - [`MemoryStore`]: in-memory, with constructors that simulate disabled or
//!   full storage for tests.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::choice::ThemeChoice;
use crate::error::StorageError;

/// Key under which the choice is stored unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// A synchronous, local key-value store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Reads the persisted choice. Never fails; every problem reads as `System`.
pub fn load_choice<S: PreferenceStore + ?Sized>(store: &S, key: &str) -> ThemeChoice {
    match store.get(key) {
        Ok(None) => ThemeChoice::System,
        Ok(Some(value)) => match ThemeChoice::from_value(&value) {
            Some(choice) if !choice.is_system() => choice,
            _ => {
                tracing::warn!(key, value = %value, "ignoring unrecognised stored theme");
                ThemeChoice::System
            }
        },
        Err(err) => {
            tracing::warn!(key, error = %err, "could not read stored theme");
            ThemeChoice::System
        }
    }
}

/// Writes the choice, or removes the key for `System`.
pub fn persist_choice<S: PreferenceStore + ?Sized>(
    store: &mut S,
    key: &str,
    choice: ThemeChoice,
) -> Result<(), StorageError> {
    match choice.stored_value() {
        Some(value) => store.set(key, value),
        None => store.remove(key),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Availability {
    #[default]
    Available,
    ReadOnly,
    Unavailable,
}

/// In-memory store.
///
/// # Example
///
/// ```rust
/// use shade::{MemoryStore, PreferenceStore};
///
/// let store = MemoryStore::new().with_entry("theme", "dark");
/// assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
///
/// let mut full = MemoryStore::read_only();
/// assert!(full.set("theme", "light").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    availability: Availability,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where every operation fails, like disabled browser storage.
    pub fn unavailable() -> Self {
        Self {
            availability: Availability::Unavailable,
            ..Self::default()
        }
    }

    /// A store that can be read but refuses writes and removals.
    pub fn read_only() -> Self {
        Self {
            availability: Availability::ReadOnly,
            ..Self::default()
        }
    }

    /// Seeds an entry, regardless of availability.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Inspects an entry without going through the availability checks.
    pub fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.availability == Availability::Unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self.availability {
            Availability::Unavailable => Err(StorageError::Unavailable),
            Availability::ReadOnly => Err(StorageError::quota(key)),
            Availability::Available => {
                self.entries.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match self.availability {
            Availability::Unavailable => Err(StorageError::Unavailable),
            Availability::ReadOnly => Err(StorageError::quota(key)),
            Availability::Available => {
                self.entries.remove(key);
                Ok(())
            }
        }
    }
}

/// A store backed by a JSON object file.
///
/// The file holds a flat object of string values, e.g. `{"theme": "dark"}`.
/// A missing file is an empty store. Writes rewrite the whole file and create
/// parent directories as needed. Keys other than the ones written are
/// preserved.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Entries to rewrite on `set`/`remove`. Corrupt content reads as absent
    /// and is replaced by the next write.
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    reason = %reason,
                    "overwriting corrupt preference file"
                );
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut content = serde_json::to_string_pretty(entries)?;
        content.push('\n');
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        let corrupt = matches!(self.read_entries(), Err(StorageError::Corrupt(_)));
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_some() || corrupt {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
