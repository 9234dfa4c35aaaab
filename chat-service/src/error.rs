//! Failure classification for a single chat invocation.
//!
//! Every variant is reported to the caller the same way (HTTP 500 with the
//! error text); the kind only feeds logs and tests.

use crate::services::providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid request body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Failed to call generation endpoint: {0}")]
    Upstream(#[from] ProviderError),
}

impl ChatError {
    /// Stable, machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::InvalidEvent(_) => "invalid_event",
            ChatError::InvalidJson(_) => "invalid_json",
            ChatError::InvalidRequest(_) => "invalid_request",
            ChatError::Upstream(_) => "upstream",
        }
    }
}
