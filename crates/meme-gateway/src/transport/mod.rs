//! REST transport to the chat platform

mod http;
mod models;

pub use http::HttpTransport;
pub use models::{
    AttachmentReference, AttachmentResponse, AuthorResponse, ChannelResponse,
    CreateMessageRequest, MessageResponse,
};
