//! Integration tests for the local HTTP server.

mod common;

use common::{generate_url, test_config, upstream_replying, TestApp};
use serde_json::Value;
use std::time::Duration;

#[tokio::test]
async fn health_check_returns_ok() {
    let upstream = upstream_replying("unused").await;
    let app = TestApp::spawn(test_config(generate_url(&upstream))).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-service");
}

#[tokio::test]
async fn chat_returns_generated_reply() {
    let upstream = upstream_replying("hello").await;
    let app = TestApp::spawn(test_config(generate_url(&upstream))).await;

    let response = app.post_chat(r#"{"message": "hi"}"#).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        response.headers()["access-control-allow-headers"],
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
    );

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "hello");
    assert_eq!(body["conversationHistory"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn chat_failure_is_structured() {
    let upstream = upstream_replying("unused").await;
    let app = TestApp::spawn(test_config(generate_url(&upstream))).await;

    let response = app.post_chat("not json").await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(response.headers()["access-control-allow-methods"], "OPTIONS,POST");

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn preflight_is_answered() {
    let upstream = upstream_replying("unused").await;
    let app = TestApp::spawn(test_config(generate_url(&upstream))).await;

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, format!("{}/chat", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
