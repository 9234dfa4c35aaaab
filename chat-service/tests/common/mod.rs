#![allow(dead_code)]

use chat_service::config::{ChatConfig, GenerationConfig, ProviderKind};
use chat_service::services::providers::GenerationParams;
use chat_service::startup::Application;
use serde_json::json;
use service_core::config::Config as CoreConfig;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATE_PATH: &str = "/generate";

/// Config pointing the HTTP provider at `upstream_url`, serving on a random port.
pub fn test_config(upstream_url: String) -> ChatConfig {
    ChatConfig {
        common: CoreConfig {
            port: 0,
            log_level: "debug".to_string(),
        },
        generation: GenerationConfig {
            provider: ProviderKind::Http,
            api_url: upstream_url,
            timeout_secs: Some(5),
            params: GenerationParams::default(),
        },
    }
}

/// Stub generation endpoint answering every POST with `generated_text`.
pub async fn upstream_replying(generated_text: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"generated_text": generated_text})),
        )
        .mount(&server)
        .await;
    server
}

pub fn generate_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), GENERATE_PATH)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(config: ChatConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self {
            address,
            port,
            client,
        }
    }

    pub async fn post_chat(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client
            .post(format!("{}/chat", self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to send request")
    }
}
