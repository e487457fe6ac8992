//! Gateway dispatch events
//!
//! Event names, their payloads, and the translation into [`meme_core::BotEvent`].

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    AttachmentPayload, EmojiPayload, MemberPayload, MessageCreateEvent, MessageReactionEvent,
    ReadyEvent, UserPayload,
};

use meme_core::BotEvent;
use serde_json::Value;

/// A dispatch the bot cares about
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    /// Handshake finished; carries the bot's own user
    Ready(ReadyEvent),
    Bot(BotEvent),
}

/// Decode a dispatch frame's payload
///
/// Returns `Ok(None)` for event types the bot does not consume.
pub fn decode_dispatch(event_name: &str, data: Value) -> Result<Option<DispatchEvent>, serde_json::Error> {
    let Some(event_type) = GatewayEventType::from_name(event_name) else {
        return Ok(None);
    };

    let event = match event_type {
        GatewayEventType::Ready => DispatchEvent::Ready(serde_json::from_value(data)?),
        GatewayEventType::MessageCreate => {
            let message: MessageCreateEvent = serde_json::from_value(data)?;
            DispatchEvent::Bot(message.into())
        }
        GatewayEventType::MessageReactionAdd => {
            let reaction: MessageReactionEvent = serde_json::from_value(data)?;
            DispatchEvent::Bot(BotEvent::ReactionAdded(reaction.into()))
        }
        GatewayEventType::MessageReactionRemove => {
            let reaction: MessageReactionEvent = serde_json::from_value(data)?;
            DispatchEvent::Bot(BotEvent::ReactionRemoved(reaction.into()))
        }
    };
    Ok(Some(event))
}
