//! Volatile Cache Module
//!
//! In-memory TTL cache for binary payloads (rendered PDFs and the like).
//! Nothing is serialized; blobs are reference-counted and shared with callers.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == Cached Blob ==
/// A binary payload and the file name it should be saved under, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBlob {
    pub blob: Bytes,
    pub filename: Option<String>,
}

impl CachedBlob {
    pub fn new(blob: impl Into<Bytes>, filename: Option<String>) -> Self {
        Self {
            blob: blob.into(),
            filename,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry<CachedBlob>>,
    stats: CacheStats,
}

// == Volatile Cache ==
/// Process-local blob cache. Grows without bound; entries leave only
/// through invalidation or a read that finds them expired.
#[derive(Debug)]
pub struct VolatileCache<C = SystemClock> {
    inner: Mutex<Inner>,
    clock: C,
}

impl VolatileCache {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for VolatileCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> VolatileCache<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
        }
    }

    // == Get ==
    /// Returns the live blob stored under `key`, evicting it if expired.
    pub fn get(&self, key: &str) -> Option<CachedBlob> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let expired = match inner.entries.get(key) {
            None => {
                inner.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            debug!("Volatile cache entry expired: {}", key);
            inner.entries.remove(key);
            inner.stats.record_expiration();
            return None;
        }

        inner.stats.record_hit();
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `blob` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: &str, blob: Bytes, ttl: Duration, filename: Option<String>) {
        let entry = CacheEntry::new(CachedBlob { blob, filename }, self.clock.now_ms(), ttl);
        self.lock().entries.insert(key.to_string(), entry);
    }

    // == Invalidate ==
    pub fn invalidate(&self, key: &str) {
        self.lock().entries.remove(key);
    }

    // == Get Or Fetch ==
    /// Returns the cached blob, or runs `producer` and caches its result.
    ///
    /// A producer error is returned unchanged and nothing is cached.
    pub async fn get_or_fetch<E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<CachedBlob, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedBlob, E>>,
    {
        if let Some(hit) = self.get(key) {
            debug!("Volatile cache hit: {}", key);
            return Ok(hit);
        }
        let fetched = producer().await?;
        self.set(key, fetched.blob.clone(), ttl, fetched.filename.clone());
        Ok(fetched)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.lock().stats.clone()
    }

    /// Number of entries held, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn test_cache() -> (VolatileCache<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        (VolatileCache::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_set_and_get_with_filename() {
        let (cache, _) = test_cache();

        cache.set(
            "invoice:1:download",
            Bytes::from_static(b"%PDF-1.7"),
            Duration::from_secs(60),
            Some("invoice_1.pdf".to_string()),
        );

        let hit = cache.get("invoice:1:download").unwrap();
        assert_eq!(hit.blob, Bytes::from_static(b"%PDF-1.7"));
        assert_eq!(hit.filename.as_deref(), Some("invoice_1.pdf"));
    }

    #[test]
    fn test_get_nonexistent() {
        let (cache, _) = test_cache();
        assert!(cache.get("missing").is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_expiry_evicts_on_read() {
        let (cache, clock) = test_cache();
        cache.set("k", Bytes::from_static(b"x"), Duration::from_millis(100), None);

        clock.advance(Duration::from_millis(99));
        assert!(cache.get("k").is_some());

        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.len(), 1, "No eviction before a read");
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_overwrite_replaces_filename_and_ttl() {
        let (cache, clock) = test_cache();
        cache.set(
            "k",
            Bytes::from_static(b"old"),
            Duration::from_secs(600),
            Some("old.pdf".to_string()),
        );
        cache.set("k", Bytes::from_static(b"new"), Duration::from_secs(1), None);

        let hit = cache.get("k").unwrap();
        assert_eq!(hit.blob, Bytes::from_static(b"new"));
        assert!(hit.filename.is_none());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_invalidate() {
        let (cache, _) = test_cache();
        cache.set("k", Bytes::from_static(b"x"), Duration::from_secs(60), None);

        cache.invalidate("k");
        cache.invalidate("missing");

        assert!(cache.get("k").is_none());
    }

    #[tokio::test]
    async fn test_get_or_fetch_caches_blob_and_filename() {
        let (cache, _) = test_cache();
        let mut calls = 0;

        for _ in 0..2 {
            let hit: Result<CachedBlob, String> = cache
                .get_or_fetch("k", Duration::from_secs(60), || {
                    calls += 1;
                    async {
                        Ok(CachedBlob::new(
                            Bytes::from_static(b"pdf"),
                            Some("a.pdf".to_string()),
                        ))
                    }
                })
                .await;
            assert_eq!(hit.unwrap().filename.as_deref(), Some("a.pdf"));
        }

        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_does_not_cache_failure() {
        let (cache, _) = test_cache();

        let result: Result<CachedBlob, &str> = cache
            .get_or_fetch("k", Duration::from_secs(60), || async { Err("503") })
            .await;

        assert_eq!(result.unwrap_err(), "503");
        assert!(cache.is_empty());
    }
}
