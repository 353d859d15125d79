//! Core traits for transport, storage and navigation.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{ApiResult, Envelope};

/// Transport error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection failure or non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),
    /// Loader failure (bridge strategy).
    #[error("Transport error: {0}")]
    Transport(String),
    /// No response arrived in time.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Performs one remote call.
///
/// Implementations make a single attempt and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an envelope and return the normalized result.
    async fn send(&self, envelope: &Envelope) -> Result<ApiResult, TransportError>;
}

/// Storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Internal(String),
}

/// Durable string key-value storage.
///
/// `set_many` and `remove_many` must apply all entries or none; the default
/// implementations only do so when the single-key operations cannot fail
/// part-way, so backends with real persistence override them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write several values together.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(&key, value).await?;
        }
        Ok(())
    }

    /// Delete several values together.
    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// Receives page redirect signals from the client.
///
/// Implement this trait to integrate with your UI's routing.
pub trait Navigator: Send + Sync {
    /// Navigate to `page` (e.g. `index.html`).
    fn redirect(&self, page: &str);
}
