//! Guild settings service
//!
//! Admin commands that read or change a guild's bot settings. References
//! typed by users are resolved here.

use meme_core::{format_channel_ref, parse_channel_ref, parse_role_ref, GuildConfig, Snowflake};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Snapshot of a guild's effective settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildStatus {
    pub meme_channel: Option<Snowflake>,
    pub cmd_channel: Option<Snowflake>,
    pub admin_role: Option<Snowflake>,
    pub downvote_limit: u32,
    /// Whether `downvote_limit` is the deployment default
    pub limit_is_default: bool,
}

impl GuildStatus {
    fn from_config(config: &GuildConfig, default_limit: u32) -> Self {
        Self {
            meme_channel: config.meme_channel_id,
            cmd_channel: config.cmd_channel_id,
            admin_role: config.admin_role_id,
            downvote_limit: config.effective_downvote_limit(default_limit),
            limit_is_default: config.downvote_limit.is_none(),
        }
    }
}

/// Guild settings service
pub struct GuildSettingsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuildSettingsService<'a> {
    /// Create a new GuildSettingsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Set the admin role and make `channel_id` the cmd channel
    #[instrument(skip(self))]
    pub async fn init(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
        admin_role_ref: &str,
    ) -> ServiceResult<Snowflake> {
        let role_id = parse_role_ref(admin_role_ref)?;
        let store = self.ctx.config_store();
        store.set_admin_role(guild_id, role_id).await?;
        store.set_cmd_channel(guild_id, channel_id).await?;

        info!(guild_id = %guild_id, role_id = %role_id, channel_id = %channel_id, "Guild initialized");
        Ok(role_id)
    }

    // === Meme channel ===

    pub async fn meme_channel(&self, guild_id: Snowflake) -> ServiceResult<Option<Snowflake>> {
        Ok(self.ctx.config_store().get_meme_channel(guild_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_meme_channel(
        &self,
        guild_id: Snowflake,
        channel_ref: &str,
    ) -> ServiceResult<Snowflake> {
        let channel_id = parse_channel_ref(channel_ref)?;
        self.ctx
            .config_store()
            .set_meme_channel(guild_id, channel_id)
            .await?;
        info!(guild_id = %guild_id, channel_id = %channel_id, "Meme channel set");
        Ok(channel_id)
    }

    #[instrument(skip(self))]
    pub async fn disable_meme_channel(&self, guild_id: Snowflake) -> ServiceResult<()> {
        self.ctx.config_store().disable_meme_channel(guild_id).await?;
        info!(guild_id = %guild_id, "Meme channel disabled");
        Ok(())
    }

    // === Cmd channel ===

    pub async fn cmd_channel(&self, guild_id: Snowflake) -> ServiceResult<Option<Snowflake>> {
        Ok(self.ctx.config_store().get_cmd_channel(guild_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_cmd_channel(
        &self,
        guild_id: Snowflake,
        channel_ref: &str,
    ) -> ServiceResult<Snowflake> {
        let channel_id = parse_channel_ref(channel_ref)?;
        self.ctx
            .config_store()
            .set_cmd_channel(guild_id, channel_id)
            .await?;
        info!(guild_id = %guild_id, channel_id = %channel_id, "Cmd channel set");
        Ok(channel_id)
    }

    #[instrument(skip(self))]
    pub async fn disable_cmd_channel(&self, guild_id: Snowflake) -> ServiceResult<()> {
        self.ctx.config_store().disable_cmd_channel(guild_id).await?;
        info!(guild_id = %guild_id, "Cmd channel disabled");
        Ok(())
    }

    // === Downvote limit ===

    pub async fn downvote_limit(&self, guild_id: Snowflake) -> ServiceResult<u32> {
        Ok(self.ctx.config_store().get_downvote_limit(guild_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn set_downvote_limit(&self, guild_id: Snowflake, limit: u32) -> ServiceResult<()> {
        GuildConfig::validate_downvote_limit(limit)?;
        self.ctx
            .config_store()
            .set_downvote_limit(guild_id, limit)
            .await?;
        info!(guild_id = %guild_id, limit, "Downvote limit set");
        Ok(())
    }

    /// All settings of a guild
    pub async fn status(&self, guild_id: Snowflake) -> ServiceResult<GuildStatus> {
        let store = self.ctx.config_store();
        let config = store.get_config(guild_id).await?;
        Ok(GuildStatus::from_config(&config, store.default_downvote_limit()))
    }

    /// `#name` for replies, or a channel mention when the name is unknown
    pub async fn channel_label(&self, channel_id: Snowflake) -> String {
        match self.ctx.transport().channel_name(channel_id).await {
            Ok(Some(name)) => format!("#{name}"),
            Ok(None) => format_channel_ref(channel_id),
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Channel name lookup failed");
                format_channel_ref(channel_id)
            }
        }
    }
}
