//! Events delivered by the chat platform

mod bot_event;

pub use bot_event::{BotEvent, MemberInfo, MessageReceivedEvent, ReactionEvent};
