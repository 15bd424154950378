//! Local client storage for the selected character.
//!
//! A tiny key/value store. The file implementation keeps a flat JSON object
//! next to the config file and writes it with the temp-file + rename pattern.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Key under which the selected character id is persisted.
pub const STORAGE_KEY: &str = "synchronize.selected-character";

/// File name of the storage file inside the config directory.
const STORAGE_FILE_NAME: &str = "storage.json";

/// Key/value persistence used by the selection store.
pub trait SelectionStorage {
    /// Reads a value. Missing or unreadable values are `None`.
    fn load(&self, key: &str) -> Option<String>;

    /// Writes a value.
    fn store(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl SelectionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the default location inside the config directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join(STORAGE_FILE_NAME)))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read storage file: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse storage file: {}", self.path.display()))
    }

    /// Removes a key. Used by `--reset-selection`.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all().unwrap_or_default();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize storage")?;
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp storage file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp storage file to: {}", self.path.display())
        })?;

        Ok(())
    }
}

impl SelectionStorage for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut entries) => entries.remove(key),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unreadable storage file");
                None
            }
        }
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking writes forever
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.load(STORAGE_KEY), None);

        storage.store(STORAGE_KEY, "widow").unwrap();
        assert_eq!(storage.load(STORAGE_KEY).as_deref(), Some("widow"));
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("storage.json"));
        assert_eq!(storage.load(STORAGE_KEY), None);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("storage.json");

        let mut first = FileStorage::new(&path);
        first.store(STORAGE_KEY, "thor").unwrap();
        first.store("other", "value").unwrap();

        let second = FileStorage::new(&path);
        assert_eq!(second.load(STORAGE_KEY).as_deref(), Some("thor"));
        assert_eq!(second.load("other").as_deref(), Some("value"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let mut storage = FileStorage::new(&path);
        assert_eq!(storage.load(STORAGE_KEY), None);

        storage.store(STORAGE_KEY, "hulk").unwrap();
        assert_eq!(storage.load(STORAGE_KEY).as_deref(), Some("hulk"));
    }

    #[test]
    fn test_file_storage_remove() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path().join("storage.json"));
        storage.store(STORAGE_KEY, "hulk").unwrap();

        storage.remove(STORAGE_KEY).unwrap();
        assert_eq!(storage.load(STORAGE_KEY), None);
    }
}
