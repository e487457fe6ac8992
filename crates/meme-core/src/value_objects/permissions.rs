//! Member permission bits as the platform reports them

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Only the bits the bot looks at are named; the rest are dropped on read.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        const VIEW_CHANNEL  = 1 << 0;
        const SEND_MESSAGES = 1 << 1;
        const ADMINISTRATOR = 1 << 8;
    }
}

impl Permissions {
    /// Platform administrators may always configure the bot
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }

    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse().map(Self::from_bits_truncate)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.bits(), f)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireBits {
    Number(u64),
    Text(String),
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireBits::deserialize(deserializer)? {
            WireBits::Number(bits) => Ok(Self::from_bits_truncate(bits)),
            WireBits::Text(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}
