//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{GuildConfig, MemePost};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Meme Registry
// ============================================================================

/// Durable set of tracked meme posts
///
/// Every mutation is persisted before the call returns, so a post added right
/// before a crash is still resumed on the next boot.
#[async_trait]
pub trait MemeRegistry: Send + Sync {
    /// Track a new post; fails with `DuplicateId` if `post.id` is already tracked
    async fn add(&self, post: &MemePost) -> RepoResult<()>;

    /// Stop tracking a post; absent ids are not an error
    async fn remove(&self, id: Snowflake) -> RepoResult<()>;

    /// Every currently tracked post, oldest first
    async fn all(&self) -> RepoResult<Vec<MemePost>>;
}

// ============================================================================
// Guild Config Store
// ============================================================================

/// Per-guild settings
///
/// Rows are created lazily by the first write; concurrent writes to the same
/// guild are last-write-wins.
#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    /// Full settings for a guild (unconfigured defaults if never written)
    async fn get_config(&self, guild_id: Snowflake) -> RepoResult<GuildConfig>;

    /// Limit applied when a guild has none of its own
    fn default_downvote_limit(&self) -> u32;

    async fn set_meme_channel(&self, guild_id: Snowflake, channel_id: Snowflake)
        -> RepoResult<()>;

    async fn disable_meme_channel(&self, guild_id: Snowflake) -> RepoResult<()>;

    /// Set the guild's downvote limit; must be positive
    async fn set_downvote_limit(&self, guild_id: Snowflake, limit: u32) -> RepoResult<()>;

    async fn set_cmd_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()>;

    async fn disable_cmd_channel(&self, guild_id: Snowflake) -> RepoResult<()>;

    async fn set_admin_role(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<()>;

    /// Meme channel, or `None` when posting is disabled
    async fn get_meme_channel(&self, guild_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        Ok(self.get_config(guild_id).await?.meme_channel_id)
    }

    /// Effective downvote limit for the guild
    async fn get_downvote_limit(&self, guild_id: Snowflake) -> RepoResult<u32> {
        let config = self.get_config(guild_id).await?;
        Ok(config.effective_downvote_limit(self.default_downvote_limit()))
    }

    /// Cmd channel, or `None` when commands are accepted anywhere
    async fn get_cmd_channel(&self, guild_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        Ok(self.get_config(guild_id).await?.cmd_channel_id)
    }

    /// Admin role, or `None` when platform administrators are sufficient
    async fn get_admin_role(&self, guild_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        Ok(self.get_config(guild_id).await?.admin_role_id)
    }
}
