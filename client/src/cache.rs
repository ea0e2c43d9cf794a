//! Expiring key-value cache for remote reference data.
//!
//! Caching is purely a performance optimization: every failure mode of the
//! backing store (unavailable, full, corrupt entry) degrades to a cache miss
//! and the caller refetches from the ledger service. Nothing here is allowed
//! to surface as a user-visible error.

use crate::store::CacheStore;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default entry lifetime: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Stored form of a cache entry. Owned exclusively by this module.
#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    /// Expiry instant, epoch milliseconds
    expiry: i64,
}

/// Time-bounded cache over the durable key-value store.
///
/// Eviction is lazy: an expired entry is removed by the `get` that discovers
/// it; there is no background sweep.
#[derive(Clone)]
pub struct TtlCache {
    store: CacheStore,
    default_ttl: Duration,
}

impl TtlCache {
    pub fn new(store: CacheStore) -> Self {
        Self {
            store,
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn with_default_ttl(store: CacheStore, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    /// Look up a cached value. Returns `None` for a missing key, an expired
    /// or undeserializable entry, or any store failure.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!("cache read failed for `{}`: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("evicting corrupt cache entry `{}`: {}", key, e);
                let _ = self.store.delete(key).await;
                return None;
            }
        };

        if Utc::now().timestamp_millis() > entry.expiry {
            debug!("cache entry `{}` expired, evicting", key);
            let _ = self.store.delete(key).await;
            return None;
        }

        Some(entry.data)
    }

    /// Store a value under the default TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Store a value, unconditionally replacing any existing entry and
    /// recomputing its expiry from now.
    pub async fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let entry = CacheEntry {
            data: value,
            expiry: Utc::now().timestamp_millis() + ttl.as_millis() as i64,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("cache serialize failed for `{}`: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.put(key, &raw).await {
            debug!("cache write failed for `{}`: {}", key, e);
        }
    }

    /// Drop every cached entry. Called on logout so reference data never
    /// leaks across users.
    pub async fn clear(&self) {
        if let Err(e) = self.store.clear().await {
            debug!("cache clear failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> (TtlCache, CacheStore) {
        let store = CacheStore::open_test()
            .await
            .expect("Failed to create test store");
        (TtlCache::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let (cache, _store) = setup_test().await;

        cache.set("greeting", &"hello".to_string()).await;

        let value: Option<String> = cache.get("greeting").await;
        assert_eq!(value.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (cache, _store) = setup_test().await;

        let value: Option<Vec<String>> = cache.get("never_set").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted_and_stays_absent() {
        let (cache, store) = setup_test().await;

        cache
            .set_with_ttl("short_lived", &vec![1, 2, 3], Duration::from_millis(1))
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        // The read that discovers expiry evicts the row
        let value: Option<Vec<i32>> = cache.get("short_lived").await;
        assert!(value.is_none());
        assert!(store.get("short_lived").await.unwrap().is_none());

        // No resurrection on a later read
        let value: Option<Vec<i32>> = cache.get("short_lived").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_refreshes_expiry() {
        let (cache, _store) = setup_test().await;

        cache
            .set_with_ttl("markets", &"stale".to_string(), Duration::from_millis(1))
            .await;
        // Overwrite with a fresh TTL before reading
        cache.set("markets", &"fresh".to_string()).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let value: Option<String> = cache.get("markets").await;
        assert_eq!(value.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (cache, store) = setup_test().await;

        store
            .put("markets", "not valid json {{")
            .await
            .expect("Failed to seed corrupt entry");

        let value: Option<Vec<String>> = cache.get("markets").await;
        assert!(value.is_none());
        // Corrupt row was evicted too
        assert!(store.get("markets").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_all_entries() {
        let (cache, _store) = setup_test().await;

        cache.set("markets", &"a".to_string()).await;
        cache.set("users", &"b".to_string()).await;

        cache.clear().await;

        let markets: Option<String> = cache.get("markets").await;
        let users: Option<String> = cache.get("users").await;
        assert!(markets.is_none());
        assert!(users.is_none());
    }
}
