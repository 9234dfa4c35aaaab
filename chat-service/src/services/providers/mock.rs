//! Mock provider for tests and offline runs.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use tokio::sync::Mutex;

enum Behavior {
    Echo,
    Reply(String),
    Fail(ProviderError),
}

/// Mock text provider. Records every prompt it receives unless built
/// [`without_recording`](MockTextProvider::without_recording).
pub struct MockTextProvider {
    behavior: Behavior,
    prompts: Option<Mutex<Vec<(String, GenerationParams)>>>,
}

impl MockTextProvider {
    /// Answers `Mock response for: <prompt>`.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Always answers `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply(reply.into()))
    }

    /// Always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_behavior(Behavior::Fail(error))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            prompts: Some(Mutex::new(Vec::new())),
        }
    }

    /// Stop keeping received prompts, for long-running servers.
    pub fn without_recording(mut self) -> Self {
        self.prompts = None;
        self
    }

    /// Prompts and parameters received so far, oldest first.
    pub async fn received(&self) -> Vec<(String, GenerationParams)> {
        match &self.prompts {
            Some(prompts) => prompts.lock().await.clone(),
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if let Some(prompts) = &self.prompts {
            prompts
                .lock()
                .await
                .push((prompt.to_string(), params.clone()));
        }

        match &self.behavior {
            Behavior::Echo => Ok(format!("Mock response for: {}", prompt)),
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(error) => Err(error.clone()),
        }
    }
}
