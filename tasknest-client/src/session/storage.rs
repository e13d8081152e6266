//! Persisted key-value storage
//!
//! The session is persisted as two string entries, `auth_token` and
//! `auth_user` (the user serialized as JSON). They are written and cleared
//! together.
//!
//! # Example
//!
//! ```no_run
//! use tasknest_client::session::{FileStore, KeyValueStore, TOKEN_KEY};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new(".tasknest");
//! store.set(TOKEN_KEY, "t1")?;
//! assert_eq!(store.get(TOKEN_KEY)?.as_deref(), Some("t1"));
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "auth_token";

/// Storage key of the serialized user
pub const USER_KEY: &str = "auth_user";

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file is not a valid JSON object of strings
    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Opaque string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Reads a value
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes a value (no-op if absent)
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Writes several values
    ///
    /// Implementations that can write atomically should override this.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Deletes several values
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.with_entries(|entries| entries.len())
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> T {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut entries)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.with_entries(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_entries(|entries| entries.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_entries(|entries| entries.remove(key));
        Ok(())
    }
}

/// File-backed store
///
/// All entries live in one JSON object at `<dir>/session.json`. Every write
/// replaces the file through a temporary file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,

    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store under `dir` (created on first write)
    pub fn new(dir: impl AsRef<Path>) -> Self {
        FileStore {
            path: dir.as_ref().join("session.json"),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // A corrupt file is overwritten rather than blocking every later write
        let mut entries = match self.read() {
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt storage file");
                BTreeMap::new()
            }
            other => other?,
        };
        f(&mut entries);
        self.write(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_all(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_all(&[key])
    }

    fn set_all(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        self.modify(|entries| {
            for (key, value) in pairs {
                entries.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.modify(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set_all(&[(TOKEN_KEY, "t1"), (USER_KEY, "{}")]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));

        store.remove_all(&[TOKEN_KEY, USER_KEY]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_store_remove_missing_is_noop() {
        let store = MemoryStore::new();
        assert!(store.remove(TOKEN_KEY).is_ok());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::new(dir.path());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        store.set_all(&[(TOKEN_KEY, "t1"), (USER_KEY, "u")]).unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        assert_eq!(reopened.get(USER_KEY).unwrap().as_deref(), Some("u"));

        reopened.remove_all(&[TOKEN_KEY, USER_KEY]).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = FileStore::new(&nested);
        store.set(TOKEN_KEY, "t1").unwrap();
        assert!(nested.join("session.json").exists());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.get(TOKEN_KEY), Err(StorageError::Corrupt(_))));

        // Writing replaces the corrupt file
        store.set(TOKEN_KEY, "t2").unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t2"));
    }
}
