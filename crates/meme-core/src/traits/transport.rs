//! Chat platform transport (port)
//!
//! Commands the bot issues against the platform. Events flowing the other
//! way arrive as [`crate::events::BotEvent`]s.

use async_trait::async_trait;

use crate::entities::{Attachment, ChatMessage};
use crate::value_objects::{Snowflake, Vote};

use super::RepoResult;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Repost an attachment into a channel, optionally with a caption; returns the new message id
    async fn post_attachment(
        &self,
        channel_id: Snowflake,
        attachment: &Attachment,
        caption: Option<&str>,
    ) -> RepoResult<Snowflake>;

    /// Add the bot's own reaction to a message
    async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        vote: Vote,
    ) -> RepoResult<()>;

    /// Delete a message
    ///
    /// Fails with `RetractionFailed` when the platform refuses or the message is gone.
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> RepoResult<()>;

    /// Send a plain text message; returns the new message id
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> RepoResult<Snowflake>;

    /// The message sent in `channel_id` immediately before `before`, if any
    async fn previous_message(
        &self,
        channel_id: Snowflake,
        before: Snowflake,
    ) -> RepoResult<Option<ChatMessage>>;

    /// Display name of a channel, if the bot can see it
    async fn channel_name(&self, channel_id: Snowflake) -> RepoResult<Option<String>>;
}
