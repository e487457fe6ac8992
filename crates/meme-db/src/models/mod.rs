//! Database models - SQLx-compatible structs for PostgreSQL tables

mod guild_config;
mod meme_post;

pub use guild_config::GuildConfigModel;
pub use meme_post::MemePostModel;
