//! Domain entities - core business objects

mod guild_config;
mod meme_post;
mod message;

pub use guild_config::GuildConfig;
pub use meme_post::MemePost;
pub use message::{Attachment, ChatMessage};
