//! Key-value storage capability.
//!
//! The catalog keeps its cache and the user's annotations in a flat
//! string-to-string store with the same shape as browser local storage.
//! Everything that touches persistence goes through [`KeyValueStore`] so
//! the cache and annotation logic can run against [`MemoryStore`] in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::{Error, Result};

/// Cached raw wine list payload.
pub const CACHE_KEY: &str = "winevinoCachedDataV3";
/// Epoch-millisecond timestamp of the last successful fetch.
pub const CACHE_TIMESTAMP_KEY: &str = "winevinoCacheTimestampV3";
/// Per-wine pairings and notes.
pub const ANNOTATIONS_KEY: &str = "winePairings";
/// Per-wine personal ratings.
pub const PERSONAL_SCORES_KEY: &str = "personalScores";

/// Minimal get/set/remove store keyed by string.
///
/// Methods take `&self`; implementations use interior mutability so one
/// store can be shared between the data source and the annotation store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Drop every entry.
    fn clear(&self) -> Result<()>;
}

type Entries = HashMap<String, String>;

fn lock_entries(entries: &Mutex<Entries>) -> Result<MutexGuard<'_, Entries>> {
    entries
        .lock()
        .map_err(|_| Error::Storage("store lock poisoned".into()))
}

// ── In-memory ─────────────────────────────────────────────────────────

/// Volatile store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock_entries(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock_entries(&self.entries)?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock_entries(&self.entries)?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        lock_entries(&self.entries)?.clear();
        Ok(())
    }
}

// ── File-backed ───────────────────────────────────────────────────────

/// Store persisted as a single JSON object file.
///
/// The whole map is held in memory and rewritten on every mutation via a
/// temp file and rename, so a crash never leaves a half-written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| {
                    Error::Storage(format!("{} is not a valid store file: {}", path.display(), e))
                })?
            }
        } else {
            debug!("Store file {} not found; starting empty", path.display());
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock_entries(&self.entries)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = lock_entries(&self.entries)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = lock_entries(&self.entries)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = lock_entries(&self.entries)?;
        entries.clear();
        self.persist(&entries)
    }
}
