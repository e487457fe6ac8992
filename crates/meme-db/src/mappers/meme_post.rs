//! MemePost entity <-> model mapper

use meme_core::entities::MemePost;
use meme_core::value_objects::Snowflake;

use crate::models::MemePostModel;

impl From<MemePostModel> for MemePost {
    fn from(model: MemePostModel) -> Self {
        MemePost {
            id: Snowflake::new(model.id),
            channel_id: Snowflake::new(model.channel_id),
            guild_id: Snowflake::new(model.guild_id),
            submitter_id: Snowflake::new(model.submitter_id),
            created_at: model.created_at,
        }
    }
}
