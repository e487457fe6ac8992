//! Pooled Redis connections for the settings cache.

use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// `redis://[user:password@]host:port[/db]`
    pub url: String,
    pub max_connections: usize,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 8,
        }
    }
}

impl From<&meme_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &meme_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

impl RedisPoolConfig {
    /// Host part of the URL, without credentials
    fn redacted_url(&self) -> &str {
        self.url.rsplit('@').next().unwrap_or(&self.url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("invalid Redis pool settings: {0}")]
    CreatePool(String),

    #[error("no Redis connection available: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command failed: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cached value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

/// Cheap to clone; clones share the same connections
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .finish()
    }
}

impl RedisPool {
    /// Connections are opened lazily, so an unreachable server is only
    /// noticed by the first command.
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let invalid = |e: &dyn std::fmt::Display| RedisPoolError::CreatePool(e.to_string());
        let pool = Config::from_url(config.url.as_str())
            .builder()
            .map_err(|e| invalid(&e))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| invalid(&e))?;

        tracing::info!(
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Redis pool ready"
        );
        Ok(Self { pool })
    }

    pub fn from_config(config: &meme_common::RedisConfig) -> RedisResult<Self> {
        Self::new(config.into())
    }

    async fn connection(&self) -> RedisResult<Connection> {
        Ok(self.pool.get().await?)
    }

    pub async fn health_check(&self) -> RedisResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Reads a JSON document; `None` when the key is missing or expired
    pub async fn get_json<V: DeserializeOwned>(&self, key: &str) -> RedisResult<Option<V>> {
        let raw: Option<String> = self.connection().await?.get(key).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(Into::into)
    }

    /// Stores a JSON document that expires after `ttl_seconds`
    pub async fn put_json<V: Serialize>(&self, key: &str, value: &V, ttl_seconds: u64) -> RedisResult<()> {
        let json = serde_json::to_string(value)?;
        self.connection()
            .await?
            .set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await?;
        Ok(())
    }

    /// Like `put_json`, but leaves an existing entry alone; returns whether it stored
    pub async fn put_json_if_absent<V: Serialize>(
        &self,
        key: &str,
        value: &V,
        ttl_seconds: u64,
    ) -> RedisResult<bool> {
        let json = serde_json::to_string(value)?;
        let mut conn = self.connection().await?;
        let stored: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await?;
        Ok(stored.is_some())
    }

    /// Returns whether the key existed
    pub async fn evict(&self, key: &str) -> RedisResult<bool> {
        let removed: u32 = self.connection().await?.del(key).await?;
        Ok(removed != 0)
    }
}
