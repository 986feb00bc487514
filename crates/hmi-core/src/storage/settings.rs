use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::base::{LogFacadeSink, LogSink, Result};
use crate::storage::error::StorageError;
use crate::storage::store::KeyValueStore;

/// Category-scoped view over a [`KeyValueStore`].
///
/// Keys are stored as `category/key`, so several collaborators can share one
/// store without colliding.
#[derive(Clone)]
pub struct Settings {
    category: String,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn LogSink>,
}

impl Settings {
    pub fn new(category: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_log_sink(category, store, Arc::new(LogFacadeSink))
    }

    pub fn with_log_sink(category: impl Into<String>, store: Arc<dyn KeyValueStore>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            category: category.into(),
            store,
            sink,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}/{}", self.category, key)
    }

    pub fn get(&self, key: &str, default: Value) -> Value {
        self.store.get(&self.scoped(key), default)
    }

    pub fn set(&self, key: &str, value: Value) {
        let key = self.scoped(key);
        self.sink.debug(&format!("Setting '{}' = {}", key, value));
        self.store.set(&key, value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.store.remove(&self.scoped(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(&self.scoped(key))
    }

    /// Keys of this category, without the prefix
    pub fn keys(&self) -> Vec<String> {
        let prefix = format!("{}/", self.category);
        self.store
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Typed read. Values that don't decode as `T` fall back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get(&self.scoped(key), Value::Null) {
            Value::Null => default,
            value => serde_json::from_value(value).unwrap_or(default),
        }
    }

    /// Typed write
    pub fn set_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|source| StorageError::Serialization {
            key: self.scoped(key),
            source,
        })?;
        self.set(key, value);
        Ok(())
    }

    pub fn sync(&self) -> Result<()> {
        self.sink.debug(&format!("Syncing settings category '{}'", self.category));
        self.store.sync()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings").field("category", &self.category).finish_non_exhaustive()
    }
}
