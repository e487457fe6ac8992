//! Gateway event loop

use std::sync::Arc;

use meme_service::MemeWatchEngine;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::client::ClientEvent;
use crate::router::{CommandRouter, EventClassifier, Route};

/// Routes gateway events: reactions to the engine, commands to the router
pub struct EventLoop {
    classifier: EventClassifier,
    router: Arc<CommandRouter>,
    engine: MemeWatchEngine,
}

impl EventLoop {
    pub fn new(classifier: EventClassifier, router: Arc<CommandRouter>, engine: MemeWatchEngine) -> Self {
        Self {
            classifier,
            router,
            engine,
        }
    }

    /// Handle events until the channel closes
    pub async fn run(mut self, mut events: mpsc::Receiver<ClientEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
    }

    /// Handle one event
    ///
    /// Commands run on their own task so slow REST calls never hold up
    /// reactions; the task handle is returned.
    pub fn handle(&mut self, event: ClientEvent) -> Option<JoinHandle<()>> {
        let event = match event {
            ClientEvent::Ready { user_id, .. } => {
                self.classifier.set_bot_user(user_id);
                return None;
            }
            ClientEvent::Event(event) => event,
        };
        trace!(event = event.event_type(), actor_id = %event.actor_id(), "Gateway event");

        match self.classifier.classify(event) {
            Route::Reaction(reaction) => {
                let message_id = reaction.message_id;
                if !self.engine.dispatch(reaction) {
                    trace!(message_id = %message_id, "Reaction on an unwatched message");
                }
                None
            }
            Route::GuildCommand(message) | Route::DirectCommand(message) => {
                let router = Arc::clone(&self.router);
                Some(tokio::spawn(async move { router.handle(&message).await }))
            }
            Route::Ignore(reason) => {
                debug!(reason, "Event ignored");
                None
            }
        }
    }
}
