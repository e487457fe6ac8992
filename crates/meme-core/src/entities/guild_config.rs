//! GuildConfig entity - per-guild bot settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Per-guild settings
///
/// Every `None` means "not configured":
/// - no meme channel: meme posting is disabled
/// - no downvote limit: the deployment default applies
/// - no admin role: the platform's ADMINISTRATOR permission is sufficient
/// - no cmd channel: commands are accepted in any channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub guild_id: Snowflake,
    pub meme_channel_id: Option<Snowflake>,
    pub downvote_limit: Option<u32>,
    pub admin_role_id: Option<Snowflake>,
    pub cmd_channel_id: Option<Snowflake>,
    pub updated_at: DateTime<Utc>,
}

impl GuildConfig {
    /// Limit used when neither the guild nor the deployment sets one
    pub const DEFAULT_DOWNVOTE_LIMIT: u32 = 5;

    /// A guild nobody has configured yet
    pub fn unconfigured(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            meme_channel_id: None,
            downvote_limit: None,
            admin_role_id: None,
            cmd_channel_id: None,
            updated_at: Utc::now(),
        }
    }

    /// Reject a downvote limit that would retract every post on its first down-vote
    pub fn validate_downvote_limit(limit: u32) -> Result<(), DomainError> {
        if limit == 0 {
            return Err(DomainError::ValidationError(
                "downvote limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The downvote limit in force, falling back to `default`
    #[inline]
    pub fn effective_downvote_limit(&self, default: u32) -> u32 {
        self.downvote_limit.unwrap_or(default)
    }
}
