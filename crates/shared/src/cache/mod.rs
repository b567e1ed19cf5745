mod memory;
mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};

#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
    async fn delete(&self, key: &str);
}

/// JSON cache in front of a string backend. Misses and backend failures
/// both read as `None`.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    pub async fn get_from_cache<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let raw = self.backend.get(key).await?;

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                info!("Cache hit for key: {key}");
                Some(value)
            }
            Err(e) => {
                error!("Failed to deserialize cached value for key {key}: {e}");
                None
            }
        }
    }

    pub async fn set_to_cache<T>(&self, key: &str, value: &T, ttl: Duration)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(json) => self.backend.set(key, json, ttl).await,
            Err(e) => error!("Failed to serialize value for key {key}: {e}"),
        }
    }

    pub async fn delete_from_cache(&self, key: &str) {
        self.backend.delete(key).await;
    }
}

pub mod keys {
    pub fn budget_summary(user_id: i32, year_month: &str) -> String {
        format!("budget:summary:{user_id}:{year_month}")
    }

    pub fn asset_summary(user_id: i32) -> String {
        format!("asset:summary:{user_id}")
    }

    pub fn monthly_report(user_id: i32, year_month: &str) -> String {
        format!("report:monthly:{user_id}:{year_month}")
    }

    pub fn yearly_report(user_id: i32, year: i32) -> String {
        format!("report:yearly:{user_id}:{year}")
    }
}

/// Drops every cached view derived from one user's month of data.
pub async fn invalidate_month(cache: &CacheStore, user_id: i32, year_month: &str) {
    cache
        .delete_from_cache(&keys::budget_summary(user_id, year_month))
        .await;
    cache
        .delete_from_cache(&keys::monthly_report(user_id, year_month))
        .await;

    if let Some((year, _)) = crate::utils::parse_year_month(year_month) {
        cache
            .delete_from_cache(&keys::yearly_report(user_id, year))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        total: i64,
    }

    #[tokio::test]
    async fn stores_and_reads_json_values() {
        let cache = CacheStore::in_memory();
        cache
            .set_to_cache("k", &Sample { total: 10 }, Duration::from_secs(60))
            .await;

        assert_eq!(
            cache.get_from_cache::<Sample>("k").await,
            Some(Sample { total: 10 })
        );
    }

    #[tokio::test]
    async fn invalidate_month_clears_derived_views() {
        let cache = CacheStore::in_memory();
        let ttl = Duration::from_secs(60);

        cache.set_to_cache(&keys::budget_summary(1, "2025-02"), &1, ttl).await;
        cache.set_to_cache(&keys::monthly_report(1, "2025-02"), &2, ttl).await;
        cache.set_to_cache(&keys::yearly_report(1, 2025), &3, ttl).await;
        cache.set_to_cache(&keys::monthly_report(1, "2025-03"), &4, ttl).await;

        invalidate_month(&cache, 1, "2025-02").await;

        assert_eq!(cache.get_from_cache::<i32>(&keys::budget_summary(1, "2025-02")).await, None);
        assert_eq!(cache.get_from_cache::<i32>(&keys::monthly_report(1, "2025-02")).await, None);
        assert_eq!(cache.get_from_cache::<i32>(&keys::yearly_report(1, 2025)).await, None);
        assert_eq!(
            cache.get_from_cache::<i32>(&keys::monthly_report(1, "2025-03")).await,
            Some(4)
        );
    }

    #[tokio::test]
    async fn undecodable_values_read_as_miss() {
        let cache = CacheStore::in_memory();
        cache.set_to_cache("k", &"text", Duration::from_secs(60)).await;

        assert_eq!(cache.get_from_cache::<Sample>("k").await, None);
    }
}
