//! PostgreSQL implementation of GuildConfigStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use meme_core::entities::GuildConfig;
use meme_core::traits::{GuildConfigStore, RepoResult};
use meme_core::value_objects::Snowflake;

use crate::models::GuildConfigModel;

use super::error::{map_db_error, map_lookup_error};

/// Settable columns of `guild_configs`
#[derive(Debug, Clone, Copy)]
enum Setting {
    MemeChannel,
    DownvoteLimit,
    AdminRole,
    CmdChannel,
}

impl Setting {
    fn column(self) -> &'static str {
        match self {
            Self::MemeChannel => "meme_channel_id",
            Self::DownvoteLimit => "downvote_limit",
            Self::AdminRole => "admin_role_id",
            Self::CmdChannel => "cmd_channel_id",
        }
    }
}

/// PostgreSQL implementation of GuildConfigStore
#[derive(Clone)]
pub struct PgGuildConfigStore {
    pool: PgPool,
    default_downvote_limit: u32,
}

impl PgGuildConfigStore {
    /// Create a new PgGuildConfigStore
    pub fn new(pool: PgPool, default_downvote_limit: u32) -> Self {
        Self {
            pool,
            default_downvote_limit,
        }
    }

    /// Write one setting, creating the guild's row on first use
    async fn upsert(&self, guild_id: Snowflake, setting: Setting, value: Option<i64>) -> RepoResult<()> {
        let column = setting.column();
        let sql = format!(
            "INSERT INTO guild_configs (guild_id, {column}, updated_at) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (guild_id) DO UPDATE \
             SET {column} = EXCLUDED.{column}, updated_at = NOW()"
        );

        sqlx::query(&sql)
            .bind(guild_id.into_inner())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        debug!(guild_id = %guild_id, column, "Guild setting updated");
        Ok(())
    }
}

#[async_trait]
impl GuildConfigStore for PgGuildConfigStore {
    #[instrument(skip(self))]
    async fn get_config(&self, guild_id: Snowflake) -> RepoResult<GuildConfig> {
        let result = sqlx::query_as::<_, GuildConfigModel>(
            r#"
            SELECT guild_id, meme_channel_id, downvote_limit, admin_role_id, cmd_channel_id, updated_at
            FROM guild_configs
            WHERE guild_id = $1
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_lookup_error)?;

        Ok(result.map_or_else(|| GuildConfig::unconfigured(guild_id), GuildConfig::from))
    }

    fn default_downvote_limit(&self) -> u32 {
        self.default_downvote_limit
    }

    #[instrument(skip(self))]
    async fn set_meme_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.upsert(guild_id, Setting::MemeChannel, Some(channel_id.into_inner()))
            .await
    }

    #[instrument(skip(self))]
    async fn disable_meme_channel(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.upsert(guild_id, Setting::MemeChannel, None).await
    }

    #[instrument(skip(self))]
    async fn set_downvote_limit(&self, guild_id: Snowflake, limit: u32) -> RepoResult<()> {
        GuildConfig::validate_downvote_limit(limit)?;
        self.upsert(guild_id, Setting::DownvoteLimit, Some(i64::from(limit)))
            .await
    }

    #[instrument(skip(self))]
    async fn set_cmd_channel(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<()> {
        self.upsert(guild_id, Setting::CmdChannel, Some(channel_id.into_inner()))
            .await
    }

    #[instrument(skip(self))]
    async fn disable_cmd_channel(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.upsert(guild_id, Setting::CmdChannel, None).await
    }

    #[instrument(skip(self))]
    async fn set_admin_role(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        self.upsert(guild_id, Setting::AdminRole, Some(role_id.into_inner()))
            .await
    }
}
