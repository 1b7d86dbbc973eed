//! Key-value backends
//!
//! The local-storage surface used by the session store: string keys mapped to
//! string values. Two implementations are provided:
//!
//! - [`MemoryBackend`]: process-local map, lost on exit
//! - [`FileBackend`]: one `<key>.json` file per key under a data directory

use crate::storage::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Synchronous string key-value storage
pub trait KeyValueBackend: Send + Sync {
    /// Read a value, `None` if the key is absent
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> StoreResult<()>;

    /// Short name used in log output
    fn name(&self) -> &'static str;
}

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire memory lock: {}", e)))
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// File-per-key backend rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `root`. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding `key`
    pub fn item_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueBackend for FileBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.item_path(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes).map(Some).map_err(|e| {
            StoreError::Corrupt(format!("{} is not UTF-8: {}", key, e.utf8_error()))
        })
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.item_path(key)?;
        std::fs::create_dir_all(&self.root)?;

        // Readers never observe a partially written record
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        let path = self.item_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Keys become file names, so restrict them to a safe alphabet
fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
