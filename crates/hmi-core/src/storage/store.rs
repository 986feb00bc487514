use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::base::Result;
use crate::storage::error::StorageError;

/// Key/value persistence used by settings-style collaborators.
///
/// Reads never fail: a missing key yields the caller's default. Writes stay
/// in memory until [`sync`](KeyValueStore::sync).
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `default` if there is none
    fn get(&self, key: &str, default: Value) -> Value;

    fn set(&self, key: &str, value: Value);

    /// Remove a key, returning its previous value
    fn remove(&self, key: &str) -> Option<Value>;

    fn contains(&self, key: &str) -> bool;

    /// Keys in sorted order
    fn keys(&self) -> Vec<String>;

    /// Flush pending writes to the backing medium
    fn sync(&self) -> Result<()>;
}

type Values = BTreeMap<String, Value>;

fn read_values(lock: &RwLock<Values>) -> std::sync::RwLockReadGuard<'_, Values> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_values(lock: &RwLock<Values>) -> std::sync::RwLockWriteGuard<'_, Values> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Store with no backing medium; `sync` does nothing
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<Values>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str, default: Value) -> Value {
        read_values(&self.values).get(key).cloned().unwrap_or(default)
    }

    fn set(&self, key: &str, value: Value) {
        write_values(&self.values).insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<Value> {
        write_values(&self.values).remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        read_values(&self.values).contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        read_values(&self.values).keys().cloned().collect()
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

/// Store kept in memory and persisted as one JSON object file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<Values>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first `sync`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|e| StorageError::io(e, "read", &path))?;
            if data.trim().is_empty() {
                Values::new()
            } else {
                let parsed: Value = serde_json::from_str(&data).map_err(|source| StorageError::Deserialization {
                    path: path.clone(),
                    source,
                })?;
                match parsed {
                    Value::Object(map) => map.into_iter().collect(),
                    _ => return Err(StorageError::NotAnObject(path).into()),
                }
            }
        } else {
            Values::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str, default: Value) -> Value {
        read_values(&self.values).get(key).cloned().unwrap_or(default)
    }

    fn set(&self, key: &str, value: Value) {
        write_values(&self.values).insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<Value> {
        write_values(&self.values).remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        read_values(&self.values).contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        read_values(&self.values).keys().cloned().collect()
    }

    /// Write atomically: serialize into a temp file next to the target,
    /// then rename it over the target.
    fn sync(&self) -> Result<()> {
        let data = {
            let values = read_values(&self.values);
            serde_json::to_string_pretty(&*values).map_err(|source| StorageError::Serialization {
                key: self.path.display().to_string(),
                source,
            })?
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| StorageError::io(e, "create_dir_all", &parent))?;

        let mut temp_file =
            NamedTempFile::new_in(&parent).map_err(|e| StorageError::io(e, "create_temp_file", &parent))?;
        temp_file
            .write_all(data.as_bytes())
            .map_err(|e| StorageError::io(e, "write_temp_file", temp_file.path()))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| StorageError::io(e.error, "persist_temp_file", &self.path))?;
        Ok(())
    }
}
