use super::CacheBackend;
use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};

const DEFAULT_MAX_ENTRIES: u64 = 10_000;
const MAX_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Bounded in-process cache. Each entry keeps the TTL it was written with,
/// capped at one hour.
pub struct MemoryCache {
    cache: Cache<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(MAX_TTL)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.cache.insert(key.to_string(), Entry { value, ttl }).await;
    }

    async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_entries_read_as_miss() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), Duration::ZERO).await;

        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn entries_live_until_their_ttl() {
        let cache = MemoryCache::new();
        cache.set("k", "v".to_string(), Duration::from_secs(60)).await;

        assert_eq!(cache.get("k").await.as_deref(), Some("v"));

        cache.delete("k").await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn entry_count_stays_within_capacity() {
        let cache = MemoryCache::with_capacity(8);

        for i in 0..100 {
            cache.set(&format!("k{i}"), i.to_string(), Duration::from_secs(60)).await;
        }
        cache.cache.run_pending_tasks().await;

        assert!(cache.cache.entry_count() <= 8);
    }
}
