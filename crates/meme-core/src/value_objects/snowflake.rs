//! Platform identifiers
//!
//! Messages, channels, guilds, roles and users are all addressed by a 64-bit
//! snowflake. The bot never mints one; it parses, stores and echoes them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Zero marks an id that was never filled in
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Accepts positive decimal ids only, as typed in a command argument
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            Ok(_) => Err(SnowflakeParseError::OutOfRange),
            Err(_) => Err(SnowflakeParseError::InvalidFormat),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("not a numeric id")]
    InvalidFormat,

    #[error("ids are positive")]
    OutOfRange,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The platform sends ids as strings; older payloads use plain numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireId::deserialize(deserializer)? {
            WireId::Number(id) => Ok(Self(id)),
            WireId::Text(text) => text
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format_args!("bad snowflake {text:?}"))),
        }
    }
}
