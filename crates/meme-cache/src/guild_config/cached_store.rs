//! Redis cache in front of a `GuildConfigStore`.
//!
//! Every write goes to the inner store first, then the fresh settings replace
//! the cached entry. A miss fills the cache only when no entry exists, so a
//! reader holding settings from before a write cannot overwrite the newer
//! entry. Redis failures never fail a lookup: the inner store is the source
//! of truth.
//!
//! Staleness is bounded by the TTL. If Redis rejects both the refresh and the
//! eviction after a write, or two writes to one guild race, the old entry can
//! be served until it expires.

use std::sync::Arc;

use async_trait::async_trait;
use meme_core::entities::GuildConfig;
use meme_core::traits::{GuildConfigStore, RepoResult};
use meme_core::value_objects::Snowflake;
use tracing::{debug, warn};

use crate::pool::RedisPool;

/// Key prefix for cached guild settings
pub const GUILD_CONFIG_PREFIX: &str = "guild_config:";

/// Default TTL for cached guild settings (5 minutes)
const DEFAULT_GUILD_CONFIG_TTL: u64 = 5 * 60;

/// `GuildConfigStore` decorator caching full guild settings in Redis
#[derive(Clone)]
pub struct CachedGuildConfigStore {
    inner: Arc<dyn GuildConfigStore>,
    pool: RedisPool,
    ttl_seconds: u64,
}

impl CachedGuildConfigStore {
    /// Create a new cached store
    #[must_use]
    pub fn new(inner: Arc<dyn GuildConfigStore>, pool: RedisPool) -> Self {
        Self::with_ttl(inner, pool, DEFAULT_GUILD_CONFIG_TTL)
    }

    /// Create with custom TTL
    #[must_use]
    pub fn with_ttl(inner: Arc<dyn GuildConfigStore>, pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            inner,
            pool,
            ttl_seconds,
        }
    }

    /// Generate Redis key for a guild
    fn key(guild_id: Snowflake) -> String {
        format!("{GUILD_CONFIG_PREFIX}{guild_id}")
    }

    /// Replace the cached entry with the stored settings, evicting it on failure
    async fn refresh(&self, guild_id: Snowflake) {
        let key = Self::key(guild_id);
        let refreshed = match self.inner.get_config(guild_id).await {
            Ok(config) => self
                .pool
                .put_json(&key, &config, self.ttl_seconds)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        if let Err(reason) = refreshed {
            debug!(guild_id = %guild_id, reason = %reason, "Guild settings refresh failed; evicting");
            if let Err(e) = self.pool.evict(&key).await {
                warn!(guild_id = %guild_id, error = %e, "Failed to evict cached guild settings");
            }
        }
    }
}

#[async_trait]
impl GuildConfigStore for CachedGuildConfigStore {
    async fn get_config(&self, guild_id: Snowflake) -> RepoResult<GuildConfig> {
        let key = Self::key(guild_id);

        match self.pool.get_json::<GuildConfig>(&key).await {
            Ok(Some(config)) => {
                debug!(guild_id = %guild_id, "Guild settings cache hit");
                return Ok(config);
            }
            Ok(None) => {}
            Err(e) => warn!(guild_id = %guild_id, error = %e, "Guild settings cache read failed"),
        }

        let config = self.inner.get_config(guild_id).await?;

        if let Err(e) = self.pool.put_json_if_absent(&key, &config, self.ttl_seconds).await {
            warn!(guild_id = %guild_id, error = %e, "Guild settings cache write failed");
        }

        Ok(config)
    }

    fn default_downvote_limit(&self) -> u32 {
        self.inner.default_downvote_limit()
    }

    async fn set_meme_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.inner.set_meme_channel(guild_id, channel_id).await?;
        self.refresh(guild_id).await;
        Ok(())
    }

    async fn disable_meme_channel(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.inner.disable_meme_channel(guild_id).await?;
        self.refresh(guild_id).await;
        Ok(())
    }

    async fn set_downvote_limit(&self, guild_id: Snowflake, limit: u32) -> RepoResult<()> {
        self.inner.set_downvote_limit(guild_id, limit).await?;
        self.refresh(guild_id).await;
        Ok(())
    }

    async fn set_cmd_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.inner.set_cmd_channel(guild_id, channel_id).await?;
        self.refresh(guild_id).await;
        Ok(())
    }

    async fn disable_cmd_channel(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.inner.disable_cmd_channel(guild_id).await?;
        self.refresh(guild_id).await;
        Ok(())
    }

    async fn set_admin_role(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        self.inner.set_admin_role(guild_id, role_id).await?;
        self.refresh(guild_id).await;
        Ok(())
    }
}
