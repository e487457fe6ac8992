//! Gateway client errors

use thiserror::Error;

use crate::protocol::CloseCode;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed gateway frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Expected Hello, got {0}")]
    MissingHello(String),

    #[error("Gateway closed the connection: {0}")]
    Closed(CloseCode),
}

impl GatewayError {
    /// Whether a fresh connection may succeed
    pub fn is_reconnectable(&self) -> bool {
        match self {
            Self::Closed(code) => code.should_reconnect(),
            Self::WebSocket(_) | Self::Decode(_) | Self::MissingHello(_) => true,
        }
    }
}
