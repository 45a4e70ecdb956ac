//! Key-value stores
//!
//! String values under string keys, the way a browser's local storage
//! holds them. Lists are stored as JSON arrays.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use metra_core::ConvertError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::warn;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ConvertError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConvertError>;
    fn remove(&self, key: &str) -> Result<(), ConvertError>;
}

/// In-process store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> ConvertError {
    ConvertError::storage("store lock poisoned")
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConvertError> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConvertError> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConvertError> {
        self.entries.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ConvertError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConvertError::storage(format!("invalid store key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ConvertError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConvertError::storage(format!(
                "failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConvertError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            ConvertError::storage(format!("failed to create '{}': {}", self.dir.display(), e))
        })?;
        fs::write(&path, value).map_err(|e| {
            ConvertError::storage(format!("failed to write '{}': {}", path.display(), e))
        })
    }

    fn remove(&self, key: &str) -> Result<(), ConvertError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConvertError::storage(format!(
                "failed to remove '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}

/// Read a JSON list. Absent keys and values that are not arrays read as
/// empty; unreadable elements are skipped, the rest are kept.
pub(crate) fn read_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, ConvertError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    let elements: Vec<JsonValue> = match serde_json::from_str(&raw) {
        Ok(elements) => elements,
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable stored list");
            return Ok(Vec::new());
        }
    };

    let mut items = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(item) => items.push(item),
            Err(e) => warn!(key, index, error = %e, "skipping unreadable stored entry"),
        }
    }
    Ok(items)
}

pub(crate) fn write_list<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), ConvertError> {
    let raw = serde_json::to_string(items).map_err(ConvertError::storage)?;
    store.set(key, &raw)
}
