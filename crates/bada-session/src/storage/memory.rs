//! In-memory key-value storage.

use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use bada_core::{KeyValueStore, StorageError};

/// In-memory storage implementation.
///
/// Useful for tests and short-lived processes.
/// Data is lost on restart.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?
            .remove(key);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        map.extend(entries);
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut map = self
            .entries
            .write()
            .map_err(|e| StorageError::Internal(e.to_string()))?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
