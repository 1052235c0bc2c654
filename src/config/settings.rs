//! Persisted key/value settings.
//!
//! toolbridge only relies on a small read/write contract for its settings:
//! get, set and remove a typed value by key. [`SettingsBackend`] captures
//! that contract. [`FileSettings`] stores the values in a YAML map and writes
//! through on every mutation; [`MemorySettings`] keeps them in memory for
//! tests and embedding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Result, ToolbridgeError};

/// A single persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Key/value settings storage.
///
/// Mutations must be persisted before they return.
pub trait SettingsBackend: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<SettingValue>>;

    /// Write a value.
    fn set(&self, key: &str, value: SettingValue) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Read a boolean, falling back to `default` when absent or mistyped.
    fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        Ok(match self.get(key)? {
            Some(SettingValue::Bool(b)) => b,
            _ => default,
        })
    }

    /// Read an integer, falling back to `default` when absent or mistyped.
    fn get_int(&self, key: &str, default: i64) -> Result<i64> {
        Ok(match self.get(key)? {
            Some(SettingValue::Int(i)) => i,
            _ => default,
        })
    }

    /// Read a non-empty string. Empty strings read as absent.
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(match self.get(key)? {
            Some(SettingValue::Text(s)) if !s.is_empty() => Some(s),
            _ => None,
        })
    }
}

/// Shared handle to a settings backend.
pub type SharedSettings = Arc<dyn SettingsBackend>;

/// YAML-file settings backend.
///
/// Each mutation reads the file, changes one key and writes it back
/// atomically, so several handles to the same file never clobber each
/// other's keys.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    /// Use the settings file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default settings file location (`<config_dir>/toolbridge/settings.yml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolbridge").join("settings.yml"))
    }

    /// Open the settings file at the default location.
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path().ok_or_else(|| ToolbridgeError::ConfigValidationError {
            message: "Could not determine a configuration directory".to_string(),
        })?;
        Ok(Self::new(path))
    }

    /// The settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> Result<BTreeMap<String, SettingValue>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_yaml::from_str(&content).map_err(|e| ToolbridgeError::SettingsParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Write using the write-to-temp-then-rename pattern.
    fn save_map(&self, map: &BTreeMap<String, SettingValue>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(map).map_err(|e| {
            ToolbridgeError::ConfigValidationError {
                message: format!("Failed to serialize settings: {}", e),
            }
        })?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl SettingsBackend for FileSettings {
    fn get(&self, key: &str) -> Result<Option<SettingValue>> {
        Ok(self.load_map()?.remove(key))
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<()> {
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value);
        self.save_map(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.save_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory settings backend.
///
/// Clones share the same storage. Writes are counted, and can be made to
/// fail, so callers' persistence behaviour can be asserted in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: Arc<Mutex<BTreeMap<String, SettingValue>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySettings {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write.
    pub fn with_value(self, key: &str, value: SettingValue) -> Self {
        self.lock().insert(key.to_string(), value);
        self
    }

    /// Number of successful `set`/`remove` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all stored values.
    pub fn snapshot(&self) -> BTreeMap<String, SettingValue> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, SettingValue>> {
        // A poisoned map is still a valid map.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ToolbridgeError::Io(std::io::Error::other(
                "settings storage is read-only",
            )));
        }
        Ok(())
    }
}

impl SettingsBackend for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<SettingValue>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<()> {
        self.check_writable()?;
        self.lock().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        self.lock().remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
