//! Application startup and lifecycle management.
//!
//! Builds the chat handler from configuration and, outside Lambda, serves it
//! over a local HTTP server that mirrors the API Gateway proxy integration.

use crate::config::{ChatConfig, GenerationConfig, ProviderKind};
use crate::error::ChatError;
use crate::handlers::ChatHandler;
use crate::models::{cors_headers, InboundEvent, OutboundResult};
use crate::services::providers::http::{HttpProviderConfig, HttpTextProvider};
use crate::services::providers::mock::MockTextProvider;
use crate::services::providers::TextProvider;
use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde_json::json;
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ChatHandler>,
}

/// Build the text provider selected by configuration.
pub fn build_provider(config: &GenerationConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    match config.provider {
        ProviderKind::Http => {
            let provider = HttpTextProvider::new(HttpProviderConfig {
                url: config.api_url.clone(),
                timeout: config.timeout(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

            tracing::info!(
                url = %provider.url(),
                timeout_secs = ?config.timeout_secs,
                "Initialized HTTP text provider"
            );
            Ok(Arc::new(provider))
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock text provider; replies are not generated");
            Ok(Arc::new(MockTextProvider::echo().without_recording()))
        }
    }
}

/// Build the chat handler from configuration.
pub fn build_handler(config: &ChatConfig) -> Result<ChatHandler, AppError> {
    let provider = build_provider(&config.generation)?;
    Ok(ChatHandler::new(provider, config.generation.params.clone()))
}

/// Router for the local server.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat).options(preflight))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "chat-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// The raw request body becomes the event body, as API Gateway does.
async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    match String::from_utf8(body.to_vec()) {
        Ok(body) => state
            .handler
            .handle(&InboundEvent::from_body(body))
            .await
            .into_response(),
        Err(e) => ChatHandler::reject(ChatError::InvalidEvent(format!(
            "body is not valid UTF-8: {}",
            e
        )))
        .into_response(),
    }
}

/// CORS preflight.
async fn preflight() -> Response {
    (StatusCode::OK, header_map(&cors_headers())).into_response()
}

fn header_map<'a>(headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }
    map
}

impl IntoResponse for OutboundResult {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, header_map(&self.headers), self.body).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ChatConfig) -> Result<Self, AppError> {
        let handler = build_handler(&config)?;

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Chat service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState {
                handler: Arc::new(handler),
            },
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router(provider: MockTextProvider) -> Router {
        let handler = ChatHandler::new(Arc::new(provider), Default::default());
        router(AppState {
            handler: Arc::new(handler),
        })
    }

    #[tokio::test]
    async fn preflight_returns_cors_headers() {
        let response = test_router(MockTextProvider::echo())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "OPTIONS,POST"
        );
    }

    #[tokio::test]
    async fn chat_route_writes_outbound_result() {
        let response = test_router(MockTextProvider::with_reply("hello"))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .body(Body::from(r#"{"message": "hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["response"], "hello");
    }

    #[tokio::test]
    async fn chat_route_rejects_invalid_utf8() {
        let provider = Arc::new(MockTextProvider::echo());
        let handler = ChatHandler::new(provider.clone(), Default::default());
        let app = router(AppState {
            handler: Arc::new(handler),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .body(Body::from(vec![b'{', 0xff, 0xfe, b'}']))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid event"));
        assert!(provider.received().await.is_empty());
    }

    #[tokio::test]
    async fn mock_provider_from_config_answers() {
        let config = GenerationConfig {
            provider: ProviderKind::Mock,
            api_url: String::new(),
            timeout_secs: None,
            params: Default::default(),
        };

        let provider = build_provider(&config).unwrap();
        let text = provider.generate("hi", &Default::default()).await.unwrap();

        assert_eq!(text, "Mock response for: hi");
    }

    #[test]
    fn build_provider_rejects_empty_url() {
        let config = GenerationConfig {
            provider: ProviderKind::Http,
            api_url: String::new(),
            timeout_secs: None,
            params: Default::default(),
        };

        let err = build_provider(&config).err().unwrap();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
