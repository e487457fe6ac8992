//! Repository implementations
//!
//! PostgreSQL implementations of the storage ports defined in meme-core.

mod error;
mod guild_config;
mod meme_registry;

pub use guild_config::PgGuildConfigStore;
pub use meme_registry::PgMemeRegistry;
