//! REST request and response bodies

use chrono::{DateTime, Utc};
use meme_core::{Attachment, ChatMessage, Snowflake};
use serde::{Deserialize, Serialize};

/// Body of `POST /channels/{channel_id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: String,
    /// Existing attachments to repost
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentReference>,
}

impl CreateMessageRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn repost(attachment: &Attachment, caption: Option<&str>) -> Self {
        Self {
            content: caption.unwrap_or_default().to_string(),
            attachments: vec![AttachmentReference::from(attachment)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentReference {
    pub id: Snowflake,
    pub filename: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl From<&Attachment> for AttachmentReference {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id,
            filename: attachment.filename.clone(),
            url: attachment.url.clone(),
            content_type: attachment.content_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentResponse {
    pub id: Snowflake,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub size: i64,
    pub url: String,
}

/// A message as returned by the REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: AuthorResponse,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<AttachmentResponse>,
}

/// A channel as returned by the REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelResponse {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: i32,
}

impl From<AttachmentResponse> for Attachment {
    fn from(a: AttachmentResponse) -> Self {
        Self {
            id: a.id,
            filename: a.filename,
            content_type: a.content_type,
            size: a.size,
            url: a.url,
        }
    }
}

impl From<MessageResponse> for ChatMessage {
    fn from(m: MessageResponse) -> Self {
        Self {
            id: m.id,
            channel_id: m.channel_id,
            author_id: m.author.id,
            content: m.content,
            attachments: m.attachments.into_iter().map(Attachment::from).collect(),
            created_at: m.timestamp,
        }
    }
}
