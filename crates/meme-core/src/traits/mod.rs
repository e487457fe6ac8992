//! Port traits implemented by the infrastructure crates

mod repositories;
mod transport;

pub use repositories::{GuildConfigStore, MemeRegistry, RepoResult};
pub use transport::ChatTransport;
