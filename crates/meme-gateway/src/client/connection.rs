//! Gateway session loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use meme_common::AppConfig;
use meme_core::{BotEvent, Snowflake};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, trace, warn};

use super::{Backoff, GatewayError};
use crate::events::{decode_dispatch, DispatchEvent};
use crate::protocol::{CloseCode, GatewayMessage, IdentifyPayload, OpCode};

/// Delay before the first reconnect attempt
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct GatewayClientConfig {
    pub url: String,
    pub token: String,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl GatewayClientConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            url: config.gateway.url.clone(),
            token: config.bot.token.clone(),
            initial_backoff: INITIAL_BACKOFF,
            max_backoff: Duration::from_secs(config.gateway.reconnect_max_backoff_secs),
        }
    }
}

/// What the client hands to the event loop
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A session was (re-)established as this user
    Ready {
        user_id: Snowflake,
        session_id: String,
    },
    Event(BotEvent),
}

/// Shared connection flag, read by the health endpoint
#[derive(Debug, Clone, Default)]
pub struct GatewayStatus {
    connected: Arc<AtomicBool>,
}

impl GatewayStatus {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }
}

enum SessionEnd {
    Shutdown,
    Reconnect(&'static str),
}

enum Frame {
    Message(GatewayMessage),
    Invalid(serde_json::Error),
    Closed(Option<u16>),
    Other,
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => match GatewayMessage::from_json(&text) {
                Ok(msg) => Self::Message(msg),
                Err(e) => Self::Invalid(e),
            },
            Message::Close(frame) => Self::Closed(frame.map(|f| u16::from(f.code))),
            _ => Self::Other,
        }
    }
}

/// Gateway WebSocket client
pub struct GatewayClient {
    config: GatewayClientConfig,
    status: GatewayStatus,
}

impl GatewayClient {
    pub fn new(config: GatewayClientConfig) -> Self {
        Self {
            config,
            status: GatewayStatus::default(),
        }
    }

    pub fn status(&self) -> GatewayStatus {
        self.status.clone()
    }

    /// Connect and keep reconnecting until `shutdown` flips or the gateway
    /// closes with a code that rules out reconnecting
    ///
    /// Also returns once `events` has no receiver left.
    pub async fn run(
        &self,
        events: mpsc::Sender<ClientEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), GatewayError> {
        let mut backoff = Backoff::new(self.config.initial_backoff, self.config.max_backoff);

        loop {
            let result = self.run_session(&events, &mut shutdown, &mut backoff).await;
            self.status.set_connected(false);

            match result {
                Ok(SessionEnd::Shutdown) => {
                    info!("Gateway client stopped");
                    return Ok(());
                }
                Ok(SessionEnd::Reconnect(reason)) => {
                    info!(reason, "Gateway session ended");
                }
                Err(e) if e.is_reconnectable() => {
                    warn!(error = %e, "Gateway session failed");
                }
                Err(e) => {
                    error!(error = %e, "Gateway refused the session; not reconnecting");
                    return Err(e);
                }
            }

            let delay = backoff.next_delay();
            info!(delay_ms = delay.as_millis() as u64, attempt = backoff.attempt(), "Reconnecting to gateway");
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => return Ok(()),
            }
        }
    }

    async fn run_session(
        &self,
        events: &mpsc::Sender<ClientEvent>,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut Backoff,
    ) -> Result<SessionEnd, GatewayError> {
        if *shutdown.borrow() {
            return Ok(SessionEnd::Shutdown);
        }

        debug!(url = %self.config.url, "Connecting to gateway");
        let (socket, _) = tokio_tungstenite::connect_async(self.config.url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = match stream.next().await {
            None => return Ok(SessionEnd::Reconnect("connection closed before Hello")),
            Some(message) => match Frame::from(message?) {
                Frame::Message(msg) => msg
                    .as_hello()
                    .ok_or_else(|| GatewayError::MissingHello(msg.to_string()))?,
                Frame::Closed(code) => return close_outcome(code),
                Frame::Invalid(e) => return Err(e.into()),
                Frame::Other => return Err(GatewayError::MissingHello("non-text frame".to_string())),
            },
        };

        let identify = GatewayMessage::identify(&IdentifyPayload::for_bot(&self.config.token))?;
        send(&mut sink, &identify).await?;

        let period = Duration::from_millis(hello.heartbeat_interval.max(1));
        let mut heartbeat = interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut awaiting_ack = false;
        let mut sequence: Option<u64> = None;

        debug!(heartbeat_ms = hello.heartbeat_interval, "Identified to gateway");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if let Err(e) = sink.send(Message::Close(None)).await {
                        debug!(error = %e, "Close frame not delivered");
                    }
                    return Ok(SessionEnd::Shutdown);
                }
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        return Ok(SessionEnd::Reconnect("heartbeat not acknowledged"));
                    }
                    send(&mut sink, &GatewayMessage::heartbeat(sequence)).await?;
                    awaiting_ack = true;
                }
                message = stream.next() => {
                    let Some(message) = message else {
                        return Ok(SessionEnd::Reconnect("connection closed"));
                    };
                    let msg = match Frame::from(message?) {
                        Frame::Message(msg) => msg,
                        Frame::Closed(code) => return close_outcome(code),
                        Frame::Invalid(e) => {
                            warn!(error = %e, "Skipping malformed gateway frame");
                            continue;
                        }
                        Frame::Other => continue,
                    };

                    if let Some(s) = msg.s {
                        sequence = Some(s);
                    }
                    let op = msg.op;
                    match op {
                        OpCode::Dispatch => {
                            if !self.forward_dispatch(msg, events, backoff).await {
                                return Ok(SessionEnd::Shutdown);
                            }
                        }
                        OpCode::Heartbeat => send(&mut sink, &GatewayMessage::heartbeat(sequence)).await?,
                        OpCode::HeartbeatAck => awaiting_ack = false,
                        OpCode::Reconnect => return Ok(SessionEnd::Reconnect("requested by gateway")),
                        OpCode::InvalidSession => return Ok(SessionEnd::Reconnect("invalid session")),
                        OpCode::Hello | OpCode::Identify => trace!(op = %op, "Unexpected op ignored"),
                    }
                }
            }
        }
    }

    /// Decode a dispatch and pass it on; `false` once nobody is listening
    async fn forward_dispatch(
        &self,
        msg: GatewayMessage,
        events: &mpsc::Sender<ClientEvent>,
        backoff: &mut Backoff,
    ) -> bool {
        let (Some(name), Some(data)) = (msg.t, msg.d) else {
            return true;
        };

        let event = match decode_dispatch(&name, data) {
            Ok(Some(DispatchEvent::Ready(ready))) => {
                info!(user_id = %ready.user.id, session_id = %ready.session_id, "Gateway session ready");
                self.status.set_connected(true);
                backoff.reset();
                ClientEvent::Ready {
                    user_id: ready.user.id,
                    session_id: ready.session_id,
                }
            }
            Ok(Some(DispatchEvent::Bot(event))) => ClientEvent::Event(event),
            Ok(None) => {
                trace!(event = %name, "Dispatch ignored");
                return true;
            }
            Err(e) => {
                warn!(event = %name, error = %e, "Malformed dispatch payload");
                return true;
            }
        };

        events.send(event).await.is_ok()
    }
}

async fn send<S>(sink: &mut S, message: &GatewayMessage) -> Result<(), GatewayError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    sink.send(Message::Text(message.to_json()?.into())).await?;
    Ok(())
}

fn close_outcome(code: Option<u16>) -> Result<SessionEnd, GatewayError> {
    match code.and_then(CloseCode::from_u16) {
        Some(code) if !code.should_reconnect() => Err(GatewayError::Closed(code)),
        Some(code) => {
            warn!(close_code = %code, "Gateway closed the connection");
            Ok(SessionEnd::Reconnect("closed by gateway"))
        }
        None => Ok(SessionEnd::Reconnect("closed by gateway")),
    }
}
