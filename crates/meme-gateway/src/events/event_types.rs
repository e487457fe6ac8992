//! Dispatch event names the bot consumes

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    Ready,
    MessageCreate,
    MessageReactionAdd,
    MessageReactionRemove,
}

const NAMES: [(GatewayEventType, &str); 4] = [
    (GatewayEventType::Ready, "READY"),
    (GatewayEventType::MessageCreate, "MESSAGE_CREATE"),
    (GatewayEventType::MessageReactionAdd, "MESSAGE_REACTION_ADD"),
    (GatewayEventType::MessageReactionRemove, "MESSAGE_REACTION_REMOVE"),
];

impl GatewayEventType {
    pub fn as_str(self) -> &'static str {
        NAMES
            .iter()
            .find_map(|&(event, name)| (event == self).then_some(name))
            .unwrap_or_default()
    }

    /// `None` for dispatches the bot does not subscribe to
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find_map(|&(event, wire)| (wire == name).then_some(event))
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
