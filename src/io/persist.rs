use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::recovery::{self, RecoveryEntry};

/// Key under which the whole task collection is stored.
pub const STORE_KEY: &str = "week-planner-todos";

/// Opaque key-value persistence for serialized blobs.
///
/// Nothing here is assumed to be transactional: a crash mid-save may lose the
/// write, and two processes saving the same key overwrite each other.
pub trait Persistence: Send {
    /// Read the blob stored under `key`, or `None` if nothing was ever saved.
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the blob stored under `key`.
    fn save(&self, key: &str, blob: &str) -> io::Result<()>;

    /// Record data that could not be loaded or saved. Default: dropped.
    fn record(&self, _entry: RecoveryEntry) {}
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the data directory, creating it if needed.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Persistence for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, blob: &str) -> io::Result<()> {
        recovery::atomic_write(&self.path_for(key), blob.as_bytes())
    }

    fn record(&self, entry: RecoveryEntry) {
        recovery::log_recovery(&self.dir, entry);
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Shared in-memory map. Clones see the same data, so a test can hand one
/// clone to a store and inspect or reload through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    blobs: HashMap<String, String>,
    recorded: Vec<RecoveryEntry>,
    fail_saves: bool,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `blob` under `key`
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let store = Self::new();
        store.lock().blobs.insert(key.to_string(), blob.to_string());
        store
    }

    pub fn blob(&self, key: &str) -> Option<String> {
        self.lock().blobs.get(key).cloned()
    }

    /// Make every subsequent save fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    pub fn recorded(&self) -> Vec<RecoveryEntry> {
        self.lock().recorded.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A panic while holding the lock leaves plain data behind; keep using it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Persistence for MemoryStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock().blobs.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> io::Result<()> {
        let mut inner = self.lock();
        if inner.fail_saves {
            return Err(io::Error::other("simulated save failure"));
        }
        inner.blobs.insert(key.to_string(), blob.to_string());
        inner.save_count += 1;
        Ok(())
    }

    fn record(&self, entry: RecoveryEntry) {
        self.lock().recorded.push(entry);
    }
}
