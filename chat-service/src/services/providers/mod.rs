//! Text generation provider abstractions and implementations.
//!
//! The handler talks to a `TextProvider`; the HTTP implementation calls the
//! remote generation endpoint, the mock answers locally.

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Maximum number of tokens to generate.
    pub max_new_tokens: u32,

    /// Sample instead of greedy decoding.
    pub do_sample: bool,

    /// Temperature.
    pub temperature: f64,

    /// Top-p sampling.
    pub top_p: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 512,
            do_sample: true,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// Trait for text generation backends.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a reply for `prompt`.
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<String, ProviderError>;
}
