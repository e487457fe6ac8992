//! Bot events - what the chat platform delivers to the bot
//!
//! The gateway client translates raw dispatch payloads into these so the
//! service layer never sees wire formats.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake, Vote};

/// All events the bot reacts to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BotEvent {
    MessageReceived(MessageReceivedEvent),
    ReactionAdded(ReactionEvent),
    ReactionRemoved(ReactionEvent),
}

impl BotEvent {
    /// Id of the user who caused the event
    pub fn actor_id(&self) -> Snowflake {
        match self {
            Self::MessageReceived(e) => e.author_id,
            Self::ReactionAdded(e) | Self::ReactionRemoved(e) => e.user_id,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MessageReceived(_) => "MESSAGE_RECEIVED",
            Self::ReactionAdded(_) => "REACTION_ADDED",
            Self::ReactionRemoved(_) => "REACTION_REMOVED",
        }
    }
}

/// A message posted in a channel the bot can see
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReceivedEvent {
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    /// `None` for direct messages
    pub guild_id: Option<Snowflake>,
    pub author_id: Snowflake,
    pub author_name: String,
    #[serde(default)]
    pub author_is_bot: bool,
    pub content: String,
    /// Guild membership of the author; absent in direct messages
    pub member: Option<MemberInfo>,
}

impl MessageReceivedEvent {
    /// Check if the message was sent as a direct message
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}

/// Author's roles and effective permissions in the guild
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberInfo {
    pub roles: Vec<Snowflake>,
    pub permissions: Permissions,
}

/// A reaction added to (or removed from) a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub user_id: Snowflake,
    pub emoji: String,
}

impl ReactionEvent {
    /// Check if this is the down-vote reaction
    #[inline]
    pub fn is_downvote(&self) -> bool {
        Vote::is_downvote(&self.emoji)
    }
}
