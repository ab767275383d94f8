//! Synchronous key-value stores backing the permission cache.
//!
//! Reads happen during startup hydration before any async runtime work, so
//! the trait is deliberately blocking and cheap.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, instrument};

/// Error type for cache store operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A durable string-to-string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// File-backed store, one file per key inside a profile directory.
///
/// Survives process restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => {
                debug!(cache.key = %key, "Cache hit");
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(cache.key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write then rename so a crash never leaves a half-written entry.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(cache.key = %key, "Cache set");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {
                debug!(cache.key = %key, "Cache invalidated");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, used in tests and for sessions that opt out of
/// persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}
