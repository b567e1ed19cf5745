use super::CacheBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult, aio::MultiplexedConnection};
use std::time::Duration;
use tracing::{error, info};

#[derive(Clone)]
pub struct RedisCache {
    connection: MultiplexedConnection,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("Invalid REDIS_URL")?;

        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")?;

        let _: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .context("Failed to ping Redis server")?;

        info!("Connected to Redis");

        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.connection.clone();

        let result: RedisResult<Option<String>> = conn.get(key).await;

        match result {
            Ok(value) => value,
            Err(e) => {
                error!("Redis GET failed for key {key}: {e}");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let mut conn = self.connection.clone();

        let result: RedisResult<()> = conn.set_ex(key, value, ttl.as_secs().max(1)).await;

        if let Err(e) = result {
            error!("Redis SET failed for key {key}: {e}");
        }
    }

    async fn delete(&self, key: &str) {
        let mut conn = self.connection.clone();

        let result: RedisResult<()> = conn.del(key).await;

        if let Err(e) = result {
            error!("Redis DEL failed for key {key}: {e}");
        }
    }
}
