//! Guild config database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for guild_configs table
#[derive(Debug, Clone, FromRow)]
pub struct GuildConfigModel {
    pub guild_id: i64,
    pub meme_channel_id: Option<i64>,
    pub downvote_limit: Option<i64>,
    pub admin_role_id: Option<i64>,
    pub cmd_channel_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
