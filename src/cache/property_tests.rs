//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check expiry, overwrite and failure-isolation properties
//! of both stores against a manual clock.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::cache::{DurableBackend, DurableCache, ManualClock, MemoryBackend, VolatileCache};

// == Test Configuration ==
const START_MS: i64 = 1_700_000_000_000;

// == Strategies ==
/// Generates cache keys shaped like the ones the client uses
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}(:[a-z0-9]{1,8}){0,2}".prop_map(|s| s)
}

/// Generates JSON-compatible values
fn value_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ]{0,32}", 0..8)
}

/// Generates TTLs in milliseconds (strictly positive)
fn ttl_strategy() -> impl Strategy<Value = u64> {
    1u64..10_000_000
}

type TestCache = DurableCache<Arc<MemoryBackend>, ManualClock>;

fn durable() -> (TestCache, Arc<MemoryBackend>, ManualClock) {
    let backend = Arc::new(MemoryBackend::new());
    let clock = ManualClock::new(START_MS);
    (
        DurableCache::with_clock(backend.clone(), clock.clone()),
        backend,
        clock,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Expiry correctness: live just before `ttl`, absent at exactly `ttl`.
    #[test]
    fn prop_durable_expiry(
        key in key_strategy(),
        value in value_strategy(),
        ttl in ttl_strategy()
    ) {
        let (cache, _, clock) = durable();
        cache.set(&key, &value, Duration::from_millis(ttl));

        prop_assert_eq!(cache.get::<Vec<String>>(&key), Some(value.clone()));

        clock.advance(Duration::from_millis(ttl - 1));
        prop_assert_eq!(cache.get::<Vec<String>>(&key), Some(value));

        clock.advance(Duration::from_millis(1));
        prop_assert_eq!(cache.get::<Vec<String>>(&key), None);
    }

    #[test]
    fn prop_volatile_expiry(
        key in key_strategy(),
        payload in prop::collection::vec(any::<u8>(), 0..256),
        ttl in ttl_strategy()
    ) {
        let clock = ManualClock::new(START_MS);
        let cache = VolatileCache::with_clock(clock.clone());
        cache.set(&key, Bytes::from(payload.clone()), Duration::from_millis(ttl), None);

        clock.advance(Duration::from_millis(ttl - 1));
        let hit = cache.get(&key);
        prop_assert!(hit.is_some());
        let blob = hit.unwrap().blob;
        prop_assert_eq!(blob.as_ref(), payload.as_slice());

        clock.advance(Duration::from_millis(1));
        prop_assert!(cache.get(&key).is_none());
        prop_assert!(cache.is_empty());
    }

    // Overwrite: the second write wins, value and TTL alike.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        v1 in value_strategy(),
        v2 in value_strategy(),
        t1 in ttl_strategy(),
        t2 in ttl_strategy()
    ) {
        let (cache, _, clock) = durable();
        cache.set(&key, &v1, Duration::from_millis(t1));
        cache.set(&key, &v2, Duration::from_millis(t2));

        prop_assert_eq!(cache.get::<Vec<String>>(&key), Some(v2));

        clock.advance(Duration::from_millis(t2));
        prop_assert_eq!(cache.get::<Vec<String>>(&key), None);
    }

    // Storage-failure isolation: a failed write never leaves a readable entry.
    #[test]
    fn prop_failed_write_reads_absent(
        key in key_strategy(),
        old in value_strategy(),
        new in value_strategy()
    ) {
        let (cache, backend, _) = durable();
        cache.set(&key, &old, Duration::from_secs(60));

        backend.set_failing(true);
        cache.set(&key, &new, Duration::from_secs(60));
        prop_assert_eq!(cache.get::<Vec<String>>(&key), None);
    }

    // Same with reads still working: the replaced value is never served.
    #[test]
    fn prop_rejected_write_hides_old_value(
        key in key_strategy(),
        old in value_strategy(),
        new in value_strategy()
    ) {
        let (cache, backend, _) = durable();
        cache.set(&key, &old, Duration::from_secs(60));

        backend.set_rejecting_writes(true);
        cache.set(&key, &new, Duration::from_secs(60));
        prop_assert_eq!(cache.get::<Vec<String>>(&key), None);
        prop_assert_eq!(cache.get::<Vec<String>>(&key), None);
    }

    // Keys never collide with unprefixed data sharing the backend.
    #[test]
    fn prop_prefix_isolation(key in key_strategy(), value in value_strategy()) {
        let (cache, backend, _) = durable();
        backend.insert_raw(&key, "unrelated");

        cache.set(&key, &value, Duration::from_secs(60));
        cache.invalidate(&key);

        prop_assert_eq!(backend.read(&key).unwrap(), Some("unrelated".to_string()));
    }
}

// No caching of failure: a failing producer leaves no trace, on any key.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_failed_fetch_leaves_no_trace(key in key_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (cache, backend, _) = durable();

        let result: Result<Vec<String>, String> = runtime.block_on(
            cache.get_or_fetch(&key, Duration::from_secs(60), || async { Err("boom".to_string()) }),
        );

        prop_assert!(result.is_err());
        prop_assert!(backend.is_empty());
        prop_assert_eq!(cache.get::<Vec<String>>(&key), None);
    }
}
