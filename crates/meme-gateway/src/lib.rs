//! # meme-gateway
//!
//! Chat platform adapter: the gateway WebSocket client, the REST transport,
//! command routing, the health endpoints, and the bot runtime.

pub mod client;
pub mod events;
pub mod health;
pub mod protocol;
pub mod router;
pub mod runtime;
pub mod transport;

pub use client::{GatewayClient, GatewayClientConfig, GatewayError};
pub use router::{CommandRouter, EventClassifier, Route};
pub use runtime::{run, EventLoop};
pub use transport::HttpTransport;
