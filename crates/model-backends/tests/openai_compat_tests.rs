// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `OpenAiCompatBackend`
//!
//! These tests use wiremock to mock HTTP responses and exercise the backend
//! against the chat completions wire format.

use model_client::{BackendError, GenerationRequest, HealthStatus, ModelBackend};
use model_backends::{OpenAiCompatBackend, OpenAiCompatConfig};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn create_test_config(base_url: String) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        base_url,
        api_key: "test-api-key".to_string(),
        model: "gpt-4o-mini".to_string(),
        timeout_seconds: 10,
        health_check_timeout_seconds: 5,
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1234567890,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
    })
}

#[tokio::test]
async fn complete_success() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello there")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("say hello").unwrap();
    let completion = backend.complete(&request).await.unwrap();

    assert_eq!(completion.text, "Hello there");
    assert_eq!(completion.model, "gpt-4o-mini");
    let usage = completion.token_usage.unwrap();
    assert_eq!(usage.prompt_tokens, 42);
    assert_eq!(usage.completion_tokens, 7);
}

#[tokio::test]
async fn complete_sends_system_and_user_messages() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "be terse"},
                {"role": "user", "content": "say hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi")))
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
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API key", "type": "invalid_request_error"}
        })))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let error = backend.complete(&request).await.unwrap_err();
    assert!(error.is_auth_error());
}

#[tokio::test]
async fn complete_rate_limit_error() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let error = backend.complete(&request).await.unwrap_err();
    assert!(matches!(error, BackendError::RateLimitExceeded { .. }));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn complete_server_error() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let error = backend.complete(&request).await.unwrap_err();
    assert!(matches!(error, BackendError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn complete_empty_choices_is_invalid_response() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "model": "gpt-4o-mini",
            "choices": [],
            "usage": null
        })))
        .mount(&mock_server)
        .await;

    let request = GenerationRequest::new("hello").unwrap();
    let error = backend.complete(&request).await.unwrap_err();
    assert!(matches!(error, BackendError::InvalidResponse { .. }));
}

#[tokio::test]
async fn health_check_up() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let status = backend.health_check().await.unwrap();
    assert_eq!(status, HealthStatus::Up);
}

#[tokio::test]
async fn health_check_down_on_auth_failure() {
    let mock_server = MockServer::start().await;
    let backend = OpenAiCompatBackend::new(create_test_config(mock_server.uri())).unwrap();

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let status = backend.health_check().await.unwrap();
    assert!(status.is_down());
}
