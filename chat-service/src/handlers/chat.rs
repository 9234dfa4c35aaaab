//! Chat request handler.
//!
//! Turns an inbound event into exactly one call to the text provider and
//! always answers with an [`OutboundResult`]; no error escapes.

use crate::error::ChatError;
use crate::models::{ChatReply, ChatRequest, InboundEvent, OutboundResult};
use crate::services::providers::{GenerationParams, TextProvider};
use serde_json::Value;
use std::sync::Arc;

/// Stateless chat handler, shared across invocations.
#[derive(Clone)]
pub struct ChatHandler {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
}

impl ChatHandler {
    pub fn new(provider: Arc<dyn TextProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Entry point for raw platform payloads.
    pub async fn handle_event(&self, payload: Value) -> OutboundResult {
        tracing::info!(event = %payload, "Received event");

        match serde_json::from_value::<InboundEvent>(payload) {
            Ok(event) => self.respond(&event).await,
            Err(e) => Self::reject(ChatError::InvalidEvent(e.to_string())),
        }
    }

    /// Entry point for an already decoded event.
    pub async fn handle(&self, event: &InboundEvent) -> OutboundResult {
        tracing::info!(
            body = event.body.as_deref().unwrap_or_default(),
            "Received event"
        );

        self.respond(event).await
    }

    /// Run the exchange, surfacing the failure kind instead of a response.
    #[tracing::instrument(skip(self, event), fields(message_len, history_len))]
    pub async fn process(&self, event: &InboundEvent) -> Result<ChatReply, ChatError> {
        let body = event
            .body
            .as_deref()
            .ok_or_else(|| ChatError::InvalidEvent("event has no body".to_string()))?;

        let request = ChatRequest::parse(body)?;

        tracing::Span::current().record("message_len", request.message.len());
        tracing::Span::current().record("history_len", request.conversation_history.len());

        tracing::debug!("Forwarding message to text provider");

        let response = self
            .provider
            .generate(&request.message, &self.params)
            .await?;

        Ok(ChatReply::new(
            &request.conversation_history,
            &request.message,
            response,
        ))
    }

    async fn respond(&self, event: &InboundEvent) -> OutboundResult {
        match self.process(event).await {
            Ok(reply) => OutboundResult::success(&reply),
            Err(e) => Self::reject(e),
        }
    }

    /// Log `error` and build the failure response for it.
    pub fn reject(error: ChatError) -> OutboundResult {
        tracing::error!(kind = error.kind(), error = %error, "Chat request failed");
        OutboundResult::failure(&error)
    }
}
