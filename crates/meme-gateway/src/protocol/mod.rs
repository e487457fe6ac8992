//! Gateway protocol definitions
//!
//! Op codes, frame format, close codes and the payloads the bot exchanges
//! with the platform gateway.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
