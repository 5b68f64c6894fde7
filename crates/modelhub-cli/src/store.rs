//! Key-value store persisted as a JSON object on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use modelhub_core::{KeyValueStore, StoreError};
use serde_json::{Map, Value};
use tracing::warn;

/// File name of the preferences store inside the data directory.
pub const STORE_FILE_NAME: &str = "preferences.json";

/// A [`KeyValueStore`] backed by a single JSON file.
///
/// The whole object is rewritten on every `set`. A missing or unreadable
/// file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store at `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store in `data_dir`, using [`STORE_FILE_NAME`].
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORE_FILE_NAME))
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "Ignoring unreadable preferences file");
                Map::new()
            }
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_all()
            .get(key)
            .and_then(Value::as_str)
            .map(String::from)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all();
        entries.insert(key.to_string(), Value::String(value.to_string()));

        let body = serde_json::to_string_pretty(&Value::Object(entries)).map_err(|e| {
            StoreError::Serialization {
                message: e.to_string(),
            }
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&self.path, body).map_err(io_error)
    }
}

fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Io {
        message: err.to_string(),
    }
}
