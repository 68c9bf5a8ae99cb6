//! # Preference Storage
//!
//! Theme and language survive restarts; nothing else does. The store is a
//! trait so the app can run against a file in production and memory in tests.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::language::LanguageCode;
use super::theme::ThemeMode;
use crate::core::error::{ClientError, Result};

/// Persisted user preferences. `None` means "never chosen".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageCode>,
}

pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// Preferences as a JSON file.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    /// A missing file is a first run; an unreadable one is treated the same
    /// way rather than blocking startup.
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.path.display(), e)))?;
        match serde_json::from_str(&content) {
            Ok(preferences) => Ok(preferences),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt preferences file");
                Ok(Preferences::default())
            }
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let storage_err = |e: std::io::Error| ClientError::Storage(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(storage_err)?;
            }
        }
        let content = serde_json::to_string_pretty(preferences)?;
        std::fs::write(&self.path, content).map_err(storage_err)?;
        tracing::debug!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPreferenceStore {
    preferences: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences: Mutex::new(preferences),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        Ok(*self.preferences.lock())
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        *self.preferences.lock() = *preferences;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("nested/preferences.json"));

        assert_eq!(store.load().unwrap(), Preferences::default());

        let preferences = Preferences {
            theme: Some(ThemeMode::Dark),
            language: Some(LanguageCode::Fr),
        };
        store.save(&preferences).unwrap();

        assert_eq!(store.load().unwrap(), preferences);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"dark\""));
        assert!(raw.contains("\"fr\""));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::default();
        let preferences = Preferences {
            theme: Some(ThemeMode::Light),
            language: None,
        };
        store.save(&preferences).unwrap();
        assert_eq!(store.load().unwrap(), preferences);
    }
}
