//! Persistent key-value store capability.
//!
//! Holds small user preferences (the chat API key) across sessions.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors from key-value store writes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("Storage I/O error: {message}")]
    Io {
        /// Detailed error message
        message: String,
    },

    /// The stored data could not be (de)serialized.
    #[error("Storage serialization error: {message}")]
    Serialization {
        /// Detailed error message
        message: String,
    },
}

/// A string-to-string store that survives the process.
///
/// Reads are infallible: an unreadable store behaves as empty.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("apiKey").is_none());

        store.set("apiKey", "nvapi-123").unwrap();
        assert_eq!(store.get("apiKey").as_deref(), Some("nvapi-123"));

        store.set("apiKey", "nvapi-456").unwrap();
        assert_eq!(store.get("apiKey").as_deref(), Some("nvapi-456"));
    }
}
