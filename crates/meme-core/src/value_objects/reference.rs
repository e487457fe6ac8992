//! Channel and role references typed by users
//!
//! Users mention a channel as `<#id>` and a role as `<@&id>`; a bare id is
//! accepted for both. Resolution is pure: nothing here checks that the id exists.

use crate::error::DomainError;

use super::Snowflake;

/// Parse a channel mention or bare id into the channel's Snowflake
pub fn parse_channel_ref(input: &str) -> Result<Snowflake, DomainError> {
    parse_mention(input, "<#")
}

/// Parse a role mention or bare id into the role's Snowflake
pub fn parse_role_ref(input: &str) -> Result<Snowflake, DomainError> {
    parse_mention(input, "<@&")
}

/// Render a channel id as a mention
#[must_use]
pub fn format_channel_ref(id: Snowflake) -> String {
    format!("<#{id}>")
}

/// Render a role id as a mention
#[must_use]
pub fn format_role_ref(id: Snowflake) -> String {
    format!("<@&{id}>")
}

fn parse_mention(input: &str, opening: &str) -> Result<Snowflake, DomainError> {
    let trimmed = input.trim();
    let raw = match trimmed.strip_prefix(opening) {
        Some(rest) => rest
            .strip_suffix('>')
            .ok_or_else(|| DomainError::InvalidReference(input.to_string()))?,
        None => trimmed,
    };

    Snowflake::parse(raw).map_err(|_| DomainError::InvalidReference(input.to_string()))
}
