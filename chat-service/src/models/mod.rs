//! Domain models for the chat service.

pub mod chat;
pub mod message;

pub use chat::{cors_headers, ChatReply, ChatRequest, InboundEvent, OutboundResult, CORS_HEADERS};
pub use message::{extend_history, Message, Role};
