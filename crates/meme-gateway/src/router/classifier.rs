//! Event classifier

use meme_core::{BotEvent, MessageReceivedEvent, ReactionEvent, Snowflake};

/// Where an incoming event goes
#[derive(Debug, Clone)]
pub enum Route {
    /// Prefixed message in a guild channel
    GuildCommand(MessageReceivedEvent),
    /// Prefixed message in a direct conversation
    DirectCommand(MessageReceivedEvent),
    /// Reaction added to some message; the engine decides if it's watched
    Reaction(ReactionEvent),
    Ignore(&'static str),
}

/// Sorts bot events into [`Route`]s
#[derive(Debug, Clone)]
pub struct EventClassifier {
    prefix: String,
    bot_user_id: Option<Snowflake>,
}

impl EventClassifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            bot_user_id: None,
        }
    }

    /// Remember the bot's own user id (known once the gateway is ready)
    pub fn set_bot_user(&mut self, user_id: Snowflake) {
        self.bot_user_id = Some(user_id);
    }

    fn is_self(&self, user_id: Snowflake) -> bool {
        self.bot_user_id == Some(user_id)
    }

    fn has_prefix(&self, content: &str) -> bool {
        content.split_whitespace().next() == Some(self.prefix.as_str())
    }

    pub fn classify(&self, event: BotEvent) -> Route {
        match event {
            BotEvent::MessageReceived(message) => {
                if self.is_self(message.author_id) || message.author_is_bot {
                    Route::Ignore("message from a bot")
                } else if !self.has_prefix(&message.content) {
                    Route::Ignore("not a command")
                } else if message.is_direct() {
                    Route::DirectCommand(message)
                } else {
                    Route::GuildCommand(message)
                }
            }
            BotEvent::ReactionAdded(reaction) => {
                if self.is_self(reaction.user_id) {
                    Route::Ignore("own reaction")
                } else {
                    Route::Reaction(reaction)
                }
            }
            // Tallies never decrease
            BotEvent::ReactionRemoved(_) => Route::Ignore("reaction removed"),
        }
    }
}
