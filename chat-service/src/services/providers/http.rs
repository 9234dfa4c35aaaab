//! HTTP generation endpoint provider.
//!
//! POSTs `{prompt, max_new_tokens, do_sample, temperature, top_p}` as JSON and
//! expects `{generated_text}` back.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP provider configuration.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Full URL of the generation endpoint.
    pub url: String,

    /// Request timeout; `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
}

/// Provider backed by a remote generation endpoint.
pub struct HttpTextProvider {
    config: HttpProviderConfig,
    client: Client,
}

impl HttpTextProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderError> {
        if config.url.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "generation endpoint URL is empty".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

#[async_trait]
impl TextProvider for HttpTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let request = GenerationRequest { prompt, params };

        tracing::debug!(
            url = %self.config.url,
            prompt_len = prompt.len(),
            "Sending request to generation endpoint"
        );

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: GenerationResponse = response
            .json()
            .await
            .map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            })?;

        let text = api_response.generated_text.ok_or_else(|| {
            ProviderError::InvalidResponse("response has no generated_text".to_string())
        })?;

        tracing::debug!(
            status = status.as_u16(),
            response_len = text.len(),
            "Generation endpoint responded"
        );

        Ok(text)
    }
}

// ============================================================================
// Generation endpoint request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a GenerationParams,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    generated_text: Option<String>,
}
