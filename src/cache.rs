//! Short-lived read-through cache keyed by entity id.
//!
//! Writes are single-row and always followed by an explicit `invalidate`, so a
//! small TTL only bounds staleness for rows changed outside this process.

use std::{collections::HashMap, future::Future, hash::Hash, time::Duration};

use tokio::{sync::RwLock, time::Instant};

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    pub async fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Return the cached value or run `load`; only `Some` results are stored.
    pub async fn get_or_try_load<F, Fut, E>(&self, key: K, load: F) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<V>, E>>,
    {
        if let Some(hit) = self.get(&key).await {
            return Ok(Some(hit));
        }
        let loaded = load().await?;
        if let Some(value) = &loaded {
            self.insert(key, value.clone()).await;
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl_and_miss_after_expiry() {
        let cache = TtlCache::new(Duration::from_secs(30));
        cache.insert(1, "a").await;
        assert_eq!(cache.get(&1).await, Some("a"));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cache.get(&1).await, None);
    }

    #[tokio::test]
    async fn loader_runs_once_while_cached() {
        let cache = TtlCache::new(Duration::from_secs(30));
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        for _ in 0..3 {
            let value = cache
                .get_or_try_load(7, || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(Some("row"))
                })
                .await
                .unwrap();
            assert_eq!(value, Some("row"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached_and_invalidate_drops_entry() {
        let cache: TtlCache<u8, &str> = TtlCache::new(Duration::from_secs(30));
        let none = cache
            .get_or_try_load(1, || async { Ok::<_, ()>(None) })
            .await
            .unwrap();
        assert_eq!(none, None);
        assert_eq!(cache.get(&1).await, None);

        cache.insert(1, "x").await;
        cache.invalidate(&1).await;
        assert_eq!(cache.get(&1).await, None);
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 1).await;
        assert_eq!(cache.get(&"k").await, None);
    }
}
