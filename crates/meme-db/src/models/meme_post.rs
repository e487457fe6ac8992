//! Meme post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for meme_posts table
#[derive(Debug, Clone, FromRow)]
pub struct MemePostModel {
    pub id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
    pub submitter_id: i64,
    pub created_at: DateTime<Utc>,
}
