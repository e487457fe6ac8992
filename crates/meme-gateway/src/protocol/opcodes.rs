//! Frame kinds on the gateway socket

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The `op` field of every gateway frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Dispatch,
    Heartbeat,
    Identify,
    /// Drop the socket and start a new session
    Reconnect,
    InvalidSession,
    /// Carries the heartbeat interval
    Hello,
    HeartbeatAck,
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        Ok(match raw {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            5 => Self::Reconnect,
            7 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(other),
        })
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        match op {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Identify => 2,
            OpCode::Reconnect => 5,
            OpCode::InvalidSession => 7,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
        }
    }
}

impl Serialize for OpCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8((*self).into())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        Self::try_from(raw).map_err(|op| de::Error::custom(format_args!("unknown op {op}")))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}/{}", u8::from(*self))
    }
}
