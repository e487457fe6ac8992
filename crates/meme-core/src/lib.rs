//! # meme-core
//!
//! Domain layer for the meme moderation bot: entities, value objects, bot events,
//! and the port traits implemented by the storage and transport crates.
//! This crate has zero dependencies on infrastructure (database, HTTP, WebSocket).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Attachment, ChatMessage, GuildConfig, MemePost};
pub use error::DomainError;
pub use events::{BotEvent, MemberInfo, MessageReceivedEvent, ReactionEvent};
pub use traits::{ChatTransport, GuildConfigStore, MemeRegistry, RepoResult};
pub use value_objects::{
    format_channel_ref, format_role_ref, parse_channel_ref, parse_role_ref, Permissions,
    Snowflake, SnowflakeParseError, Vote,
};
