//! Cache Module
//!
//! TTL caching for read-mostly API data: a durable store for JSON payloads
//! and a volatile in-memory store for binary blobs. Expiry is lazy; there is
//! no background sweep and no size bound.

mod backend;
mod clock;
mod durable;
mod entry;
mod stats;
mod volatile;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::{DurableBackend, FileBackend, MemoryBackend, CACHE_FILE_NAME};
pub use clock::{duration_ms, Clock, ManualClock, SystemClock};
pub use durable::{storage_key, DurableCache};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use volatile::{CachedBlob, VolatileCache};

// == Public Constants ==
/// Prefix of every durable cache key, keeping cached data apart from other
/// values sharing the same storage
pub const KEY_PREFIX: &str = "cache:";
