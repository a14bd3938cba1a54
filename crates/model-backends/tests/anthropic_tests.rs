// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `AnthropicBackend`
//!
//! These tests use wiremock to mock HTTP responses and exercise the backend
//! against the messages wire format.

use model_client::{BackendError, GenerationRequest, HealthStatus, ModelBackend};
use model_backends::{AnthropicBackend, AnthropicConfig};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn create_test_config(base_url: String) -> AnthropicConfig {
    AnthropicConfig {
        base_url,
        api_key: "test-api-key".to_string(),
        model: "claude-3-5-haiku-latest".to_string(),
        timeout_seconds: 10,
        health_check_timeout_seconds: 1,
    }
}

fn message_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-haiku-latest",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 30, "output_tokens": 5}
    })
}

#[tokio::test]
async fn complete_success() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-haiku-latest",
            "messages": [{"role": "user", "content": "say hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body("Hello there")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("say hello").unwrap();
    let completion = backend.complete(&request).await.unwrap();

    assert_eq!(completion.text, "Hello there");
    let usage = completion.token_usage.unwrap();
    assert_eq!(usage.prompt_tokens, 30);
    assert_eq!(usage.completion_tokens, 5);
}

#[tokio::test]
async fn complete_sends_system_as_top_level_field() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"system": "be terse"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body("hi")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("say hello")
        .unwrap()
        .with_system_prompt("be terse");
    backend.complete(&request).await.unwrap();
}

#[tokio::test]
async fn complete_authentication_error() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let error = backend.complete(&request).await.unwrap_err();
    assert!(error.is_auth_error());
}

#[tokio::test]
async fn complete_overloaded_is_service_unavailable() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let error = backend.complete(&request).await.unwrap_err();
    assert!(matches!(error, BackendError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn complete_skips_non_text_blocks() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_test",
            "model": "claude-3-5-haiku-latest",
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "answer"}
            ],
            "usage": {"input_tokens": 1, "output_tokens": 1}
        })))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let completion = backend.complete(&request).await.unwrap();
    assert_eq!(completion.text, "answer");
}

#[tokio::test]
async fn health_check_accepts_bad_request_as_up() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "error",
            "error": {"type": "invalid_request_error", "message": "max_tokens too small"}
        })))
        .mount(&mock_server)
        .await;

    let status = backend.health_check().await.unwrap();
    assert_eq!(status, HealthStatus::Up);
}

#[tokio::test]
async fn health_check_times_out_against_a_stalled_endpoint() {
    let mock_server = MockServer::start().await;
    let backend = AnthropicBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(message_body("late"))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let error = backend.health_check().await.unwrap_err();
    assert!(matches!(error, BackendError::Timeout { .. }));
}
