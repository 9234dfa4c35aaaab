//! Request handlers for the chat service.

pub mod chat;

pub use chat::ChatHandler;
