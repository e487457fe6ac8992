//! Dispatch payloads

use meme_core::{
    BotEvent, MemberInfo, MessageReceivedEvent, Permissions, ReactionEvent, Snowflake,
};
use serde::{Deserialize, Serialize};

/// READY payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Gateway protocol version
    pub v: i32,
    /// The bot's own user
    pub user: UserPayload,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_gateway_url: Option<String>,
}

/// User data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Guild membership of a message author
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberPayload {
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    /// Effective permissions in the channel the message was sent in
    #[serde(default)]
    pub permissions: Permissions,
}

/// MESSAGE_CREATE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberPayload>,
    #[serde(default)]
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

/// Attachment data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub id: Snowflake,
    pub filename: String,
    pub size: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Reaction emoji: a bare unicode string, or an emoji object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmojiPayload {
    Unicode(String),
    Object {
        #[serde(default)]
        id: Option<Snowflake>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl EmojiPayload {
    /// The symbol compared against vote emojis; custom emojis without a name yield ""
    pub fn symbol(&self) -> &str {
        match self {
            Self::Unicode(s) => s,
            Self::Object { name, .. } => name.as_deref().unwrap_or_default(),
        }
    }
}

/// MESSAGE_REACTION_ADD/REMOVE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReactionEvent {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub emoji: EmojiPayload,
}

impl From<MessageCreateEvent> for BotEvent {
    fn from(message: MessageCreateEvent) -> Self {
        BotEvent::MessageReceived(MessageReceivedEvent {
            message_id: message.id,
            channel_id: message.channel_id,
            guild_id: message.guild_id,
            author_id: message.author.id,
            author_name: message.author.username,
            author_is_bot: message.author.bot,
            content: message.content,
            member: message.member.map(|m| MemberInfo {
                roles: m.roles,
                permissions: m.permissions,
            }),
        })
    }
}

impl From<MessageReactionEvent> for ReactionEvent {
    fn from(reaction: MessageReactionEvent) -> Self {
        Self {
            message_id: reaction.message_id,
            channel_id: reaction.channel_id,
            guild_id: reaction.guild_id,
            user_id: reaction.user_id,
            emoji: reaction.emoji.symbol().to_string(),
        }
    }
}
