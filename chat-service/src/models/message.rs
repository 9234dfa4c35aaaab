//! Conversation messages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant".
    pub role: Role,

    /// Message content.
    pub content: String,

    /// Any other keys the client attached, echoed back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            extra: Map::new(),
        }
    }
}

/// Return a copy of `history` followed by the user turn and the assistant
/// reply, in that order. `history` itself is left untouched.
pub fn extend_history(history: &[Message], user: &str, assistant: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.extend_from_slice(history);
    messages.push(Message::user(user));
    messages.push(Message::assistant(assistant));
    messages
}
