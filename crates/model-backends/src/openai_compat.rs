// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! OpenAI-compatible chat completions backend
//!
//! This module implements the `ModelBackend` trait for any provider exposing
//! the OpenAI `chat/completions` wire format. It is the primary backend in
//! the default gateway configuration.

use std::time::Duration;

use model_client::{BackendError, Completion, GenerationRequest, HealthStatus, ModelBackend};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

/// Configuration for the OpenAI-compatible backend
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Model identifier to request
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "test-api-key".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 30,
            health_check_timeout_seconds: 5,
        }
    }
}

/// OpenAI-compatible backend implementation
#[derive(Debug)]
pub struct OpenAiCompatBackend {
    client: Client,
    config: OpenAiCompatConfig,
}

/// Errors specific to the OpenAI-compatible backend
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum OpenAiCompatError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Response carried no usable completion
    #[error("Empty completion: {0}")]
    EmptyCompletion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl From<OpenAiCompatError> for BackendError {
    fn from(value: OpenAiCompatError) -> Self {
        match value {
            OpenAiCompatError::Http(error) => BackendError::Http {
                message: error.to_string(),
            },
            OpenAiCompatError::Json(error) => BackendError::InvalidResponse {
                message: error.to_string(),
            },
            OpenAiCompatError::Api { status, message } => {
                if (500..=599).contains(&status) {
                    BackendError::ServiceUnavailable {
                        message: format!("{status}: {message}"),
                    }
                } else {
                    BackendError::Http {
                        message: format!("{status}: {message}"),
                    }
                }
            }
            OpenAiCompatError::RateLimited => BackendError::RateLimitExceeded {
                retry_after_seconds: 60,
            },
            OpenAiCompatError::Unauthorized => BackendError::Authentication {
                message: value.to_string(),
            },
            OpenAiCompatError::EmptyCompletion(message) => {
                BackendError::InvalidResponse { message }
            }
            OpenAiCompatError::Config(message) => BackendError::Configuration { message },
            OpenAiCompatError::Timeout { seconds } => BackendError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

/// A single message in the chat conversation
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

/// A single completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Token usage block
#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenAiCompatBackend {
    /// Create a new OpenAI-compatible backend
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be constructed
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, OpenAiCompatError> {
        if config.api_key.is_empty() {
            return Err(OpenAiCompatError::Config(
                "API key cannot be empty".to_string(),
            ));
        }
        if config.model.is_empty() {
            return Err(OpenAiCompatError::Config(
                "Model identifier cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("gather-ai/0.1.0")
            .build()?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Created OpenAI-compatible backend"
        );

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn handle_error_response(
        status: StatusCode,
        body: String,
    ) -> Result<Completion, OpenAiCompatError> {
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => Err(OpenAiCompatError::Unauthorized),
            429 => Err(OpenAiCompatError::RateLimited),
            status => Err(OpenAiCompatError::Api { status, message }),
        }
    }
}

impl ModelBackend for OpenAiCompatBackend {
    #[instrument(skip(self, request), fields(model = %self.config.model, request_id))]
    async fn complete(&self, request: &GenerationRequest) -> Result<Completion, BackendError> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        debug!(
            request_id = %request_id,
            prompt_length = request.prompt.len(),
            max_tokens = request.max_tokens,
            "Sending chat completion request"
        );

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.as_str().to_string(),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(OpenAiCompatError::Http)?;

        let status = response.status();
        let text = response.text().await.map_err(OpenAiCompatError::Http)?;

        if !status.is_success() {
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "Chat completion request failed"
            );
            return Ok(Self::handle_error_response(status, text)?);
        }

        let completion: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(OpenAiCompatError::Json)?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiCompatError::EmptyCompletion("no choices returned".to_string()))?;

        if let Some(ref usage) = completion.usage {
            debug!(
                request_id = %request_id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }

        Ok(Completion {
            text: choice.message.content,
            model: completion.model,
            token_usage: completion.usage.map(|u| model_client::TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, BackendError> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));

        debug!(url, "Performing health check on OpenAI-compatible backend");

        let start_time = std::time::Instant::now();
        let response = timeout(
            Duration::from_secs(self.config.health_check_timeout_seconds),
            self.client.get(&url).bearer_auth(&self.config.api_key).send(),
        )
        .await
        .map_err(|_| OpenAiCompatError::Timeout {
            seconds: start_time.elapsed().as_secs(),
        })?
        .map_err(OpenAiCompatError::Http)?;

        match response.status() {
            StatusCode::OK => {
                info!(
                    "OpenAI-compatible backend health check passed in {:?}",
                    start_time.elapsed()
                );
                Ok(HealthStatus::Up)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(HealthStatus::Down {
                reason: "authentication failed".to_string(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Ok(HealthStatus::Degraded {
                reason: "rate limited".to_string(),
            }),
            status => Ok(HealthStatus::Down {
                reason: format!("unexpected status {status}"),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "openai-compat"
    }
}
