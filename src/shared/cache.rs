//! Read-through cache with time-based expiry and tag invalidation.
//!
//! Entries live in a `moka` cache. Every tag carries a generation counter
//! that is part of the entry key, so `invalidate(tag)` makes all entries
//! stored under the old generation unreachable at once, including values a
//! load that started before the invalidation writes back afterwards.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use moka::future::Cache;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    key: String,
    generations: Vec<(&'static str, u64)>,
}

impl CacheKey {
    fn has_tag(&self, tag: &str) -> bool {
        self.generations.iter().any(|(t, _)| *t == tag)
    }
}

pub struct TaggedCache<V> {
    entries: Cache<CacheKey, V>,
    generations: DashMap<&'static str, u64>,
}

impl<V: Clone + Send + Sync + 'static> TaggedCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .support_invalidation_closures()
                .build(),
            generations: DashMap::new(),
        }
    }

    fn cache_key(&self, key: &str, tags: &[&'static str]) -> CacheKey {
        let generations = tags
            .iter()
            .map(|tag| (*tag, self.generations.get(tag).map(|g| *g).unwrap_or(0)))
            .collect();
        CacheKey {
            key: key.to_string(),
            generations,
        }
    }

    /// Live value stored under `key` with `tags`
    pub async fn get(&self, key: &str, tags: &[&'static str]) -> Option<V> {
        self.entries.get(&self.cache_key(key, tags)).await
    }

    pub async fn insert(&self, key: &str, tags: &[&'static str], value: V) {
        self.entries.insert(self.cache_key(key, tags), value).await;
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    ///
    /// Concurrent misses on the same key share one `load`. Errors are not
    /// cached and are handed to every waiter behind an `Arc`.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        tags: &[&'static str],
        load: F,
    ) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: Send + Sync + 'static,
    {
        let cache_key = self.cache_key(key, tags);
        self.entries
            .try_get_with(cache_key, async move {
                tracing::debug!("Cache miss: {}", key);
                load().await
            })
            .await
    }

    /// Drop every entry stored under `tag`
    pub fn invalidate(&self, tag: &'static str) {
        *self.generations.entry(tag).or_insert(0) += 1;

        if let Err(e) = self
            .entries
            .invalidate_entries_if(move |key, _| key.has_tag(tag))
        {
            tracing::warn!("Tagged invalidation unavailable ({}), clearing cache", e);
            self.entries.invalidate_all();
        }

        tracing::debug!("Cache tag '{}' invalidated", tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_get_or_insert_loads_once() {
        let cache: TaggedCache<u32> = TaggedCache::new(HOUR);
        let counter = AtomicUsize::new(0);
        let loads = &counter;

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("answer", &["numbers"], || async move {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_load() {
        let cache: TaggedCache<u32> = TaggedCache::new(HOUR);
        let counter = AtomicUsize::new(0);
        let loads = &counter;
        let load = || async move {
            loads.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, String>(7)
        };

        let (a, b) = tokio::join!(
            cache.get_or_try_insert_with("k", &["images"], load),
            cache.get_or_try_insert_with("k", &["images"], load),
        );

        assert_eq!((a.unwrap(), b.unwrap()), (7, 7));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_only_drops_matching_tag() {
        let cache: TaggedCache<&str> = TaggedCache::new(HOUR);
        cache.insert("a", &["images"], "first").await;
        cache.insert("b", &["images", "all"], "second").await;
        cache.insert("c", &["service-images"], "third").await;

        cache.invalidate("images");

        assert_eq!(cache.get("a", &["images"]).await, None);
        assert_eq!(cache.get("b", &["images", "all"]).await, None);
        assert_eq!(cache.get("c", &["service-images"]).await, Some("third"));
    }

    #[tokio::test]
    async fn test_load_started_before_invalidation_is_not_served() {
        let cache: TaggedCache<&str> = TaggedCache::new(HOUR);
        let (release, released) = oneshot::channel::<()>();

        let (stale, _) = tokio::join!(
            cache.get_or_try_insert_with("images:pool", &["images"], || async move {
                let _ = released.await;
                Ok::<_, String>("row-still-present")
            }),
            async {
                cache.invalidate("images");
                let _ = release.send(());
            },
        );
        assert_eq!(stale.unwrap(), "row-still-present");

        assert_eq!(cache.get("images:pool", &["images"]).await, None);
        let fresh = cache
            .get_or_try_insert_with("images:pool", &["images"], || async {
                Ok::<_, String>("after-delete")
            })
            .await
            .unwrap();
        assert_eq!(fresh, "after-delete");
    }

    #[tokio::test]
    async fn test_expired_entries_are_not_returned() {
        let cache: TaggedCache<u32> = TaggedCache::new(Duration::from_millis(20));
        cache.insert("short", &[], 1).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.get("short", &[]).await, None);
    }

    #[tokio::test]
    async fn test_load_errors_are_not_cached() {
        let cache: TaggedCache<u32> = TaggedCache::new(HOUR);

        let result = cache
            .get_or_try_insert_with("k", &[], || async { Err::<u32, _>("boom") })
            .await;
        assert_eq!(result.unwrap_err().as_ref(), &"boom");

        let value = cache
            .get_or_try_insert_with("k", &[], || async { Ok::<_, &str>(7) })
            .await;
        assert_eq!(value.ok(), Some(7));
    }
}
