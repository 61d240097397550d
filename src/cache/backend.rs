//! Durable Backend Module
//!
//! Storage behind the durable cache: a synchronous string-keyed
//! read/write/remove interface over text payloads. Backends report failures
//! as `StorageError`; the cache decides what to do with them.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// File name of the durable cache document inside the cache directory
pub const CACHE_FILE_NAME: &str = "cache.json";

// == Backend Trait ==
/// Text key-value storage that outlives a single cache instance.
pub trait DurableBackend: Send + Sync {
    /// Returns the stored text for `key`, if any.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<B: DurableBackend + ?Sized> DurableBackend for Arc<B> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<B: DurableBackend + ?Sized> DurableBackend for Box<B> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> StorageResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
}

/// Bytes used by a map of keys to text values.
fn used_bytes<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> usize {
    entries.map(|(k, v)| k.len() + v.len()).sum()
}

/// Fails with `QuotaExceeded` if writing `key`/`value` would go over `quota`.
fn check_quota(
    current: usize,
    previous: Option<&String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> StorageResult<()> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let freed = previous.map(|v| key.len() + v.len()).unwrap_or(0);
    let used = current - freed + key.len() + value.len();
    if used > quota {
        return Err(StorageError::QuotaExceeded { used, quota });
    }
    Ok(())
}

// == Memory Backend ==
/// In-process backend with the durable contract.
///
/// Can be switched into a failing mode to behave like disabled storage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    failing: AtomicBool,
    rejecting_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Makes every subsequent operation fail with `Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes writes and removes fail while reads keep working, like a full
    /// or read-only store.
    pub fn set_rejecting_writes(&self, rejecting: bool) {
        self.rejecting_writes.store(rejecting, Ordering::SeqCst);
    }

    /// Number of stored keys, including expired ones not yet read.
    pub fn len(&self) -> usize {
        lock(&self.entries).map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores raw text, bypassing the cache's encoding. Used to plant
    /// unrelated or corrupt data.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut entries) = lock(&self.entries) {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }

    fn ensure_writable(&self) -> StorageResult<()> {
        self.ensure_available()?;
        if self.rejecting_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }
        Ok(())
    }
}

impl DurableBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        let mut entries = lock(&self.entries)?;
        check_quota(
            used_bytes(entries.iter()),
            entries.get(key),
            key,
            value,
            self.quota,
        )?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_writable()?;
        lock(&self.entries)?.remove(key);
        Ok(())
    }
}

// == File Backend ==
/// Single JSON document on disk holding every key, loaded once and written
/// through on each mutation.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    quota: Option<usize>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    /// Opens (or creates) the cache document in `dir`.
    ///
    /// An unreadable or corrupt document is discarded rather than failing
    /// the open; it only ever held cached data.
    pub fn open(dir: impl AsRef<Path>, quota: Option<usize>) -> StorageResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(CACHE_FILE_NAME);

        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Discarding corrupt cache file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(
            "Opened durable cache at {} with {} keys",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            quota,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the cache document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let text = serde_json::to_string(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl DurableBackend for FileBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(lock(&self.entries)?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = lock(&self.entries)?;
        check_quota(
            used_bytes(entries.iter()),
            entries.get(key),
            key,
            value,
            self.quota,
        )?;

        entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            // Neither the new nor the replaced value may be served; the key
            // also leaves the disk with the next successful persist
            entries.remove(key);
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = lock(&self.entries)?;
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();

        backend.write("k", "v").unwrap();
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));

        backend.remove("k").unwrap();
        assert!(backend.read("k").unwrap().is_none());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_memory_backend_remove_missing_key() {
        let backend = MemoryBackend::new();
        assert!(backend.remove("missing").is_ok());
    }

    #[test]
    fn test_memory_backend_failing_mode() {
        let backend = MemoryBackend::new();
        backend.write("k", "v").unwrap();
        backend.set_failing(true);

        assert!(matches!(backend.read("k"), Err(StorageError::Unavailable(_))));
        assert!(matches!(
            backend.write("k", "w"),
            Err(StorageError::Unavailable(_))
        ));

        backend.set_failing(false);
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_backend_quota() {
        let backend = MemoryBackend::with_quota(10);

        backend.write("ab", "cdef").unwrap(); // 6 bytes
        let result = backend.write("gh", "ijklmn"); // +8 bytes
        assert!(matches!(
            result,
            Err(StorageError::QuotaExceeded { used: 14, quota: 10 })
        ));
        assert!(backend.read("gh").unwrap().is_none());

        // Overwriting frees the previous value first
        backend.write("ab", "12345678").unwrap();
    }

    #[test]
    fn test_memory_backend_rejecting_writes() {
        let backend = MemoryBackend::new();
        backend.write("k", "v").unwrap();
        backend.set_rejecting_writes(true);

        assert!(backend.write("k", "w").is_err());
        assert!(backend.remove("k").is_err());
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_backend_failed_persist_drops_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), None).unwrap();
        backend.write("k", "old").unwrap();

        // A directory in the temp file's place makes every persist fail
        fs::create_dir(dir.path().join("cache.json.tmp")).unwrap();
        assert!(backend.write("k", "new").is_err());
        assert!(backend.read("k").unwrap().is_none());

        fs::remove_dir(dir.path().join("cache.json.tmp")).unwrap();
        backend.write("other", "1").unwrap();
        let reopened = FileBackend::open(dir.path(), None).unwrap();
        assert!(reopened.read("k").unwrap().is_none());
        assert_eq!(reopened.read("other").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_file_backend_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let backend = FileBackend::open(dir.path(), None).unwrap();
            backend.write("cache:a", "1").unwrap();
            backend.write("cache:b", "2").unwrap();
            backend.remove("cache:b").unwrap();
        }

        let reopened = FileBackend::open(dir.path(), None).unwrap();
        assert_eq!(reopened.read("cache:a").unwrap().as_deref(), Some("1"));
        assert!(reopened.read("cache:b").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_discards_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CACHE_FILE_NAME), "not json").unwrap();

        let backend = FileBackend::open(dir.path(), None).unwrap();
        assert!(backend.read("anything").unwrap().is_none());
    }

    #[test]
    fn test_file_backend_quota_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path(), Some(8)).unwrap();

        backend.write("k", "small").unwrap();
        assert!(matches!(
            backend.write("k2", "too large"),
            Err(StorageError::QuotaExceeded { .. })
        ));

        let reopened = FileBackend::open(dir.path(), Some(8)).unwrap();
        assert!(reopened.read("k2").unwrap().is_none());
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("small"));
    }
}
