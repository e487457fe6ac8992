//! GuildConfig entity <-> model mapper

use meme_core::entities::GuildConfig;
use meme_core::value_objects::Snowflake;

use crate::models::GuildConfigModel;

impl From<GuildConfigModel> for GuildConfig {
    fn from(model: GuildConfigModel) -> Self {
        GuildConfig {
            guild_id: Snowflake::new(model.guild_id),
            meme_channel_id: model.meme_channel_id.map(Snowflake::new),
            // Out-of-range limits fall back to the deployment default
            downvote_limit: model
                .downvote_limit
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0),
            admin_role_id: model.admin_role_id.map(Snowflake::new),
            cmd_channel_id: model.cmd_channel_id.map(Snowflake::new),
            updated_at: model.updated_at,
        }
    }
}
