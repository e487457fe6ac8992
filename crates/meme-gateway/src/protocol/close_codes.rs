//! Gateway close codes

use std::fmt;

/// Codes the gateway closes a session with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    UnknownError = 4000,
    UnknownOpcode = 4001,
    DecodeError = 4002,
    NotAuthenticated = 4003,
    /// The bot token was rejected
    AuthenticationFailed = 4004,
    AlreadyAuthenticated = 4005,
    InvalidSequence = 4007,
    RateLimited = 4008,
    SessionTimeout = 4009,
    InvalidShard = 4010,
    ShardingRequired = 4011,
    /// The gateway no longer speaks this protocol version
    InvalidApiVersion = 4012,
}

/// Every known code with the reason logged for it
const KNOWN: [(CloseCode, &str); 12] = [
    (CloseCode::UnknownError, "gateway hit an internal error"),
    (CloseCode::UnknownOpcode, "we sent an opcode the gateway does not know"),
    (CloseCode::DecodeError, "we sent a payload the gateway could not decode"),
    (CloseCode::NotAuthenticated, "we sent a payload before identifying"),
    (CloseCode::AuthenticationFailed, "bot token rejected"),
    (CloseCode::AlreadyAuthenticated, "we identified twice"),
    (CloseCode::InvalidSequence, "sequence number out of range"),
    (CloseCode::RateLimited, "we sent payloads too fast"),
    (CloseCode::SessionTimeout, "session timed out"),
    (CloseCode::InvalidShard, "shard configuration rejected"),
    (CloseCode::ShardingRequired, "bot is in too many guilds to run unsharded"),
    (CloseCode::InvalidApiVersion, "protocol version no longer supported"),
];

impl CloseCode {
    pub fn from_u16(value: u16) -> Option<Self> {
        KNOWN
            .iter()
            .map(|(code, _)| *code)
            .find(|code| code.as_u16() == value)
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// `false` for codes that fail the same way on every attempt
    pub const fn should_reconnect(self) -> bool {
        !matches!(
            self,
            Self::AuthenticationFailed
                | Self::InvalidShard
                | Self::ShardingRequired
                | Self::InvalidApiVersion
        )
    }

    pub fn reason(self) -> &'static str {
        KNOWN
            .iter()
            .find(|(code, _)| *code == self)
            .map_or("", |&(_, reason)| reason)
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason(), self.as_u16())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
