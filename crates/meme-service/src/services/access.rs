//! Access guard
//!
//! Decides whether a guild command may run: is it sent in the cmd channel,
//! and does the author hold moderation rights.

use meme_core::{MemberInfo, Snowflake};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// `true` when no cmd channel is configured, or `channel_id` is the configured one
#[inline]
pub fn channel_permitted(cmd_channel: Option<Snowflake>, channel_id: Snowflake) -> bool {
    cmd_channel.map_or(true, |configured| configured == channel_id)
}

/// `true` when no admin role is configured, the member holds it, or is a platform administrator
#[inline]
pub fn rights_granted(
    admin_role: Option<Snowflake>,
    member_roles: &[Snowflake],
    has_platform_admin: bool,
) -> bool {
    has_platform_admin || admin_role.map_or(true, |role| member_roles.contains(&role))
}

/// Access guard over the guild config store
pub struct AccessGuard<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessGuard<'a> {
    /// Create a new AccessGuard
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if commands may be issued in `channel_id`
    #[instrument(skip(self))]
    pub async fn is_authorized_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<bool> {
        let cmd_channel = self.ctx.config_store().get_cmd_channel(guild_id).await?;
        Ok(channel_permitted(cmd_channel, channel_id))
    }

    /// Check if a member may change the guild's settings
    #[instrument(skip(self, member_roles))]
    pub async fn has_moderation_rights(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        member_roles: &[Snowflake],
        has_platform_admin: bool,
    ) -> ServiceResult<bool> {
        let admin_role = self.ctx.config_store().get_admin_role(guild_id).await?;
        let granted = rights_granted(admin_role, member_roles, has_platform_admin);
        if !granted {
            debug!(guild_id = %guild_id, member_id = %member_id, "Moderation rights denied");
        }
        Ok(granted)
    }

    /// Same as `has_moderation_rights`, failing with `PermissionDenied`
    pub async fn require_moderation_rights(
        &self,
        guild_id: Snowflake,
        member_id: Snowflake,
        member: &MemberInfo,
    ) -> ServiceResult<()> {
        let is_admin = member.permissions.is_admin();
        if self
            .has_moderation_rights(guild_id, member_id, &member.roles, is_admin)
            .await?
        {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied)
        }
    }
}
