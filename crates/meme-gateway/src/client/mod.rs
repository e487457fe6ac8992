//! Gateway client
//!
//! Keeps one WebSocket session to the platform alive and forwards decoded
//! events to the bot's event loop.

mod backoff;
mod connection;
mod error;

pub use backoff::Backoff;
pub use connection::{ClientEvent, GatewayClient, GatewayClientConfig, GatewayStatus};
pub use error::GatewayError;
