//! Value objects - immutable types that represent domain concepts

mod permissions;
mod reference;
mod snowflake;
mod vote;

pub use permissions::Permissions;
pub use reference::{format_channel_ref, format_role_ref, parse_channel_ref, parse_role_ref};
pub use snowflake::{Snowflake, SnowflakeParseError};
pub use vote::Vote;
