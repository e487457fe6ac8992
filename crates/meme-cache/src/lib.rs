//! # meme-cache
//!
//! Redis caching layer for guild settings.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Guild Settings**: Read-through cache in front of any `GuildConfigStore`
//!
//! ## Example
//!
//! ```ignore
//! use meme_cache::{CachedGuildConfigStore, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = CachedGuildConfigStore::new(Arc::new(pg_store), pool, 300);
//! let limit = store.get_downvote_limit(guild_id).await?;
//! ```

pub mod guild_config;
pub mod pool;

pub use guild_config::{CachedGuildConfigStore, GUILD_CONFIG_PREFIX};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
