//! Command replies
//!
//! The texts the bot answers commands with.

use std::fmt;

/// Tone of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Success,
    Info,
    Error,
}

impl ReplyStatus {
    /// Marker shown in front of the reply text
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Info => "ℹ️",
            Self::Error => "❌",
        }
    }
}

/// A reply to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub status: ReplyStatus,
    pub text: String,
}

impl CommandReply {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            text: text.into(),
        }
    }

    /// Generic failure for `action`, e.g. "set the meme channel"
    pub fn failure(action: &str) -> Self {
        Self::error(format!("We couldn't {action}.\nThat's all we know."))
    }

    // === Meme channel ===

    pub fn meme_channel_set(channel: &str) -> Self {
        Self::success(format!("We've set the meme channel to {channel}"))
    }

    pub fn meme_channel_disabled() -> Self {
        Self::success("We successfully disabled the meme channel.")
    }

    pub fn meme_channel_status(channel: Option<&str>) -> Self {
        Self::info(match channel {
            Some(channel) => format!("The meme channel is set to {channel}"),
            None => "The meme channel is disabled.".to_string(),
        })
    }

    // === Cmd channel ===

    pub fn cmd_channel_set(channel: &str) -> Self {
        Self::success(format!("We've set the cmd channel to {channel}"))
    }

    pub fn cmd_channel_disabled() -> Self {
        Self::success("We successfully disabled the cmd channel.")
    }

    pub fn cmd_channel_status(channel: Option<&str>) -> Self {
        Self::info(match channel {
            Some(channel) => format!("The cmd channel is set to {channel}"),
            None => "The cmd channel is disabled.".to_string(),
        })
    }

    // === Downvote limit ===

    pub fn downvote_limit_set(limit: u32) -> Self {
        Self::success(format!("We've set the downvote limit to {limit}"))
    }

    pub fn downvote_limit_status(limit: u32) -> Self {
        Self::info(format!("The downvote limit is {limit}"))
    }

    // === Misc ===

    pub fn initialized(role_ref: &str, channel: &str) -> Self {
        Self::success(format!(
            "We've set the admin role to {role_ref} and the cmd channel to {channel}"
        ))
    }

    pub fn meme_posted() -> Self {
        Self::success("Your meme has been posted.")
    }

    pub fn guild_only() -> Self {
        Self::error("This command only works in a guild channel.")
    }

    pub fn direct_message_only() -> Self {
        Self::error("Send this command to us in a direct message.")
    }
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.icon(), self.text)
    }
}
