//! Durable Cache Module
//!
//! JSON values with a TTL, kept in a `DurableBackend` under the `cache:`
//! prefix. Storage failures never escape: reads turn into misses and writes
//! into no-ops.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, Clock, DurableBackend, SystemClock, KEY_PREFIX};
use crate::error::StorageResult;

/// Outcome of a backend lookup before it is collapsed to an `Option`.
enum Lookup<T> {
    Hit(T),
    Miss,
    Expired,
}

// == Durable Cache ==
/// TTL cache over a durable text store.
#[derive(Debug)]
pub struct DurableCache<B, C = SystemClock> {
    backend: B,
    clock: C,
    stats: Mutex<CacheStats>,
    /// Keys whose stored value could not be replaced or removed. They read
    /// as absent until a later write or removal of the key succeeds.
    stale: Mutex<HashSet<String>>,
}

impl<B: DurableBackend> DurableCache<B> {
    /// Creates a cache over `backend` using the wall clock.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: DurableBackend, C: Clock> DurableCache<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            stats: Mutex::new(CacheStats::new()),
            stale: Mutex::new(HashSet::new()),
        }
    }

    // == Get ==
    /// Returns the live value stored under `key`.
    ///
    /// An expired entry is removed by this read. Unreadable or undecodable
    /// entries are reported as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if self.is_stale(key) {
            debug!("Durable cache entry is stale: {}", key);
            self.with_stats(CacheStats::record_miss);
            return None;
        }
        match self.try_get(key) {
            Ok(Lookup::Hit(value)) => {
                debug!("Durable cache hit: {}", key);
                self.with_stats(CacheStats::record_hit);
                Some(value)
            }
            Ok(Lookup::Miss) => {
                debug!("Durable cache miss: {}", key);
                self.with_stats(CacheStats::record_miss);
                None
            }
            Ok(Lookup::Expired) => {
                debug!("Durable cache entry expired: {}", key);
                self.with_stats(CacheStats::record_expiration);
                None
            }
            Err(e) => {
                warn!("Durable cache read failed for {}: {}", key, e);
                self.with_stats(|s| {
                    s.record_storage_failure();
                    s.record_miss();
                });
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// Best effort: a failed write leaves no entry behind and is only logged.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        let Err(e) = self.try_set(key, value, ttl) else {
            self.mark_stale(key, false);
            return;
        };
        warn!("Durable cache write failed for {}: {}", key, e);
        self.with_stats(CacheStats::record_storage_failure);

        // The previous value must not be served after a failed overwrite
        match self.backend.remove(&storage_key(key)) {
            Ok(()) => self.mark_stale(key, false),
            Err(e) => {
                warn!("Durable cache cleanup failed for {}: {}", key, e);
                self.with_stats(CacheStats::record_storage_failure);
                self.mark_stale(key, true);
            }
        }
    }

    // == Invalidate ==
    /// Removes the entry under `key`, if any.
    pub fn invalidate(&self, key: &str) {
        match self.backend.remove(&storage_key(key)) {
            Ok(()) => self.mark_stale(key, false),
            Err(e) => {
                warn!("Durable cache invalidate failed for {}: {}", key, e);
                self.with_stats(CacheStats::record_storage_failure);
                self.mark_stale(key, true);
            }
        }
    }

    // == Get Or Fetch ==
    /// Returns the cached value, or runs `producer` and caches its result.
    ///
    /// A producer error is returned unchanged and nothing is cached.
    /// Concurrent callers missing on the same key each run their producer.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = producer().await?;
        self.set(key, &value, ttl);
        Ok(value)
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Lookup<T>> {
        let storage_key = storage_key(key);
        let Some(raw) = self.backend.read(&storage_key)? else {
            return Ok(Lookup::Miss);
        };
        let entry: CacheEntry<T> = serde_json::from_str(&raw)?;
        if entry.is_expired(self.clock.now_ms()) {
            self.backend.remove(&storage_key)?;
            return Ok(Lookup::Expired);
        }
        Ok(Lookup::Hit(entry.value))
    }

    fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> StorageResult<()> {
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        let raw = serde_json::to_string(&entry)?;
        self.backend.write(&storage_key(key), &raw)
    }

    fn is_stale(&self, key: &str) -> bool {
        self.stale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn mark_stale(&self, key: &str, stale: bool) {
        let mut keys = self.stale.lock().unwrap_or_else(PoisonError::into_inner);
        if stale {
            keys.insert(key.to_string());
        } else {
            keys.remove(key);
        }
    }

    fn with_stats(&self, f: impl FnOnce(&mut CacheStats)) {
        f(&mut self.stats.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

/// Key under which `key` is stored in the backend.
pub fn storage_key(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}
