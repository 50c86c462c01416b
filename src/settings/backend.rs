//! Key-value storage backends for persisted settings.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::error::SettingsError;

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "timeflex";

/// A string key-value store.
///
/// Implementations do blocking I/O; the settings store calls them from
/// `spawn_blocking`.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// Stores a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

// ============================================================================
// FileKeyValueStore
// ============================================================================

/// Stores each key as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in `<config dir>/timeflex`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::NoDataDirectory` if the platform has no
    /// config directory.
    pub fn in_config_dir() -> Result<Self, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoDataDirectory)?;
        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    /// Returns the root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are dropped, so `@timeflex_settings`
    /// maps to `timeflex_settings.json`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SettingsError::ReadFailed(format!(
                "{}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SettingsError::WriteFailed(format!("{}: {}", self.dir.display(), e))
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| SettingsError::WriteFailed(format!("{}: {}", path.display(), e)))
    }
}

// ============================================================================
// In-memory backends
// ============================================================================

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Returns the number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the raw stored value.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A store whose every operation fails. Used to exercise fallbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Err(SettingsError::ReadFailed(format!("{key}: unavailable")))
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), SettingsError> {
        Err(SettingsError::WriteFailed(format!("{key}: unavailable")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_strips_symbols() {
        let store = FileKeyValueStore::new("/tmp/tf");
        assert_eq!(
            store.path_for("@timeflex_settings"),
            PathBuf::from("/tmp/tf/timeflex_settings.json")
        );
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested"));

        store.set("@key", "{\"a\":1}").unwrap();

        assert_eq!(store.get("@key").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(!store.path_for("@key").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryKeyValueStore::with_value("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_failing_store() {
        assert!(FailingKeyValueStore.get("k").is_err());
        assert!(FailingKeyValueStore.set("k", "v").is_err());
    }
}
