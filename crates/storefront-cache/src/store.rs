use std::collections::BTreeSet;
use std::future::Future;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::invalidation::InvalidationEvent;
use crate::keys::CacheKey;

/// Shared handle to the response cache.
///
/// Cloning is cheap and every clone sees the same entries. Entries have no
/// time-to-live and are only removed through [`KvCache::delete`] or
/// [`KvCache::invalidate`].
#[derive(Clone)]
pub struct KvCache {
    entries: Cache<String, String>,
}

impl Default for KvCache {
    fn default() -> Self {
        Self::new()
    }
}

impl KvCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    pub fn has(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key.to_string().as_str())
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.get(key.to_string().as_str()).await
    }

    pub async fn set(&self, key: &CacheKey, value: String) {
        self.entries.insert(key.to_string(), value).await;
    }

    /// Remove entries. Missing keys are ignored.
    pub async fn delete<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a CacheKey>,
    {
        for key in keys {
            self.entries.invalidate(key.to_string().as_str()).await;
        }
    }

    /// Approximate number of live entries
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Evict everything `event` makes stale and return the evicted keys.
    pub async fn invalidate(&self, event: &InvalidationEvent) -> BTreeSet<CacheKey> {
        let keys = event.stale_keys();
        self.delete(&keys).await;
        debug!(keys = ?keys, "Invalidated cache entries");
        keys
    }

    /// Return the cached value for `key`, or run `loader`, cache its result
    /// and return it.
    ///
    /// A failed load caches nothing. An entry that no longer deserializes
    /// into `T` is treated as a miss and replaced.
    pub async fn read_through<T, E, F, Fut>(&self, key: &CacheKey, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(raw) = self.get(key).await {
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key = %key, error = %e, "Discarding unreadable cache entry"),
            }
        }

        debug!(key = %key, "Cache miss");
        let value = loader().await?;
        let raw = serde_json::to_string(&value).map_err(CacheError::from)?;
        self.set(key, raw).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    enum TestError {
        Load,
        Cache,
    }

    impl From<CacheError> for TestError {
        fn from(_: CacheError) -> Self {
            TestError::Cache
        }
    }

    async fn load_counted(
        cache: &KvCache,
        key: &CacheKey,
        calls: &AtomicUsize,
        value: Vec<u32>,
    ) -> Result<Vec<u32>, TestError> {
        cache
            .read_through(key, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
            .await
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = KvCache::new();
        let calls = AtomicUsize::new(0);
        let key = CacheKey::AllProducts;

        let first = load_counted(&cache, &key, &calls, vec![1, 2]).await.unwrap();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.has(&key));

        // Different loader output proves the second read came from the cache
        let second = load_counted(&cache, &key, &calls, vec![9]).await.unwrap();
        assert_eq!(second, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidation_forces_reload() {
        let cache = KvCache::new();
        let calls = AtomicUsize::new(0);
        let key = CacheKey::product(5);

        load_counted(&cache, &key, &calls, vec![1]).await.unwrap();
        let evicted = cache.invalidate(&InvalidationEvent::product([5])).await;
        assert!(evicted.contains(&key));
        assert!(!cache.has(&key));

        let reloaded = load_counted(&cache, &key, &calls, vec![2]).await.unwrap();
        assert_eq!(reloaded, vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache = KvCache::new();
        let key = CacheKey::order(1);

        let result: Result<String, TestError> = cache
            .read_through(&key, || async { Err(TestError::Load) })
            .await;
        assert!(matches!(result, Err(TestError::Load)));
        assert!(!cache.has(&key));
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_reloaded() {
        let cache = KvCache::new();
        let key = CacheKey::AdminStats;
        cache.set(&key, "not json".to_string()).await;

        let calls = AtomicUsize::new(0);
        let value = load_counted(&cache, &key, &calls, vec![3]).await.unwrap();
        assert_eq!(value, vec![3]);
        assert_eq!(cache.get(&key).await.as_deref(), Some("[3]"));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_noop() {
        let cache = KvCache::new();
        cache.set(&CacheKey::AllCoupons, "[]".to_string()).await;
        cache
            .delete(&[CacheKey::AllOrders, CacheKey::my_orders("nobody")])
            .await;
        assert!(cache.has(&CacheKey::AllCoupons));
    }

    #[tokio::test]
    async fn test_invalidate_leaves_unrelated_keys() {
        let cache = KvCache::new();
        for key in [CacheKey::AllCoupons, CacheKey::AllOrders, CacheKey::AdminStats] {
            cache.set(&key, "1".to_string()).await;
        }
        cache
            .invalidate(&InvalidationEvent::product(Vec::<String>::new()))
            .await;

        assert!(cache.has(&CacheKey::AllCoupons));
        assert!(cache.has(&CacheKey::AllOrders));
        assert!(!cache.has(&CacheKey::AdminStats));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = KvCache::new();
        let other = cache.clone();
        cache.set(&CacheKey::Categories, "[]".to_string()).await;
        assert!(other.has(&CacheKey::Categories));
    }
}
