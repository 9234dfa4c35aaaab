//! Request and response shapes of the chat function.

use super::message::{extend_history, Message};
use crate::error::ChatError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use validator::Validate;

/// Headers attached to every response, success or failure.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
];

/// HTTP-trigger event delivered by the platform. Only `body` is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub body: Option<String>,
}

impl InboundEvent {
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Decoded and validated request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required and must not be empty"))]
    pub message: String,

    #[serde(default)]
    pub conversation_history: Vec<Message>,
}

impl ChatRequest {
    /// Decode a JSON body and check that it carries a usable message.
    pub fn parse(body: &str) -> Result<Self, ChatError> {
        let request: ChatRequest = serde_json::from_str(body)?;
        request.validate()?;
        Ok(request)
    }
}

/// Outcome of a successful exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub conversation_history: Vec<Message>,
}

impl ChatReply {
    pub fn new(history: &[Message], message: &str, response: String) -> Self {
        let conversation_history = extend_history(history, message, &response);
        Self {
            response,
            conversation_history,
        }
    }
}

/// Proxy-integration response returned to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResult {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl OutboundResult {
    pub fn success(reply: &ChatReply) -> Self {
        let body = json!({
            "success": true,
            "response": reply.response,
            "conversationHistory": reply.conversation_history,
        });
        Self::with_body(200, body)
    }

    pub fn failure(error: &ChatError) -> Self {
        let body = json!({
            "success": false,
            "error": error.to_string(),
        });
        Self::with_body(500, body)
    }

    fn with_body(status_code: u16, body: serde_json::Value) -> Self {
        Self {
            status_code,
            headers: cors_headers(),
            body: body.to_string(),
        }
    }
}

pub fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
