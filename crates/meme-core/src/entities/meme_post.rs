//! MemePost entity - one reposted attachment tracked for community voting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A tracked meme post
///
/// `id` is the platform id of the repost in the meme channel. A post is never
/// updated in place: once retracted it is removed from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemePost {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Snowflake,
    pub submitter_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl MemePost {
    /// Create a new MemePost stamped with the current time
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        guild_id: Snowflake,
        submitter_id: Snowflake,
    ) -> Self {
        Self {
            id,
            channel_id,
            guild_id,
            submitter_id,
            created_at: Utc::now(),
        }
    }

    /// Check if a user submitted this meme
    #[inline]
    pub fn is_submitted_by(&self, user_id: Snowflake) -> bool {
        self.submitter_id == user_id
    }
}
