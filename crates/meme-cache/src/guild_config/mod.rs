//! Guild settings cache

mod cached_store;

pub use cached_store::{CachedGuildConfigStore, GUILD_CONFIG_PREFIX};
