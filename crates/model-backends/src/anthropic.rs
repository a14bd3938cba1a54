// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Anthropic messages backend
//!
//! This module implements the `ModelBackend` trait for the Anthropic
//! `v1/messages` wire format. It is the fallback backend in the default
//! gateway configuration.

use std::time::Duration;

use model_client::{BackendError, Completion, GenerationRequest, HealthStatus, ModelBackend};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic backend
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
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

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: "test-api-key".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            timeout_seconds: 30,
            health_check_timeout_seconds: 5,
        }
    }
}

/// Anthropic backend implementation
#[derive(Debug)]
pub struct AnthropicBackend {
    client: Client,
    config: AnthropicConfig,
}

/// Errors specific to the Anthropic backend
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum AnthropicError {
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

    /// Response carried no usable text block
    #[error("Empty completion: {0}")]
    EmptyCompletion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl From<AnthropicError> for BackendError {
    fn from(value: AnthropicError) -> Self {
        match value {
            AnthropicError::Http(error) => BackendError::Http {
                message: error.to_string(),
            },
            AnthropicError::Json(error) => BackendError::InvalidResponse {
                message: error.to_string(),
            },
            AnthropicError::Api { status, message } => {
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
            AnthropicError::RateLimited => BackendError::RateLimitExceeded {
                retry_after_seconds: 60,
            },
            AnthropicError::Unauthorized => BackendError::Authentication {
                message: value.to_string(),
            },
            AnthropicError::EmptyCompletion(message) => BackendError::InvalidResponse { message },
            AnthropicError::Config(message) => BackendError::Configuration { message },
            AnthropicError::Timeout { seconds } => BackendError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Messages API response body
#[derive(Debug, Deserialize)]
struct MessageResponse {
    model: String,
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    /// A plain text block
    Text { text: String },
    /// Any block type this client does not consume
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
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

impl AnthropicBackend {
    /// Create a new Anthropic backend
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be constructed
    pub fn new(config: AnthropicConfig) -> Result<Self, AnthropicError> {
        if config.api_key.is_empty() {
            return Err(AnthropicError::Config("API key cannot be empty".to_string()));
        }
        if config.model.is_empty() {
            return Err(AnthropicError::Config(
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
            "Created Anthropic backend"
        );

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn handle_error_response(
        status: StatusCode,
        body: String,
    ) -> Result<Completion, AnthropicError> {
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => Err(AnthropicError::Unauthorized),
            429 => Err(AnthropicError::RateLimited),
            status => Err(AnthropicError::Api { status, message }),
        }
    }
}

impl ModelBackend for AnthropicBackend {
    #[instrument(skip(self, request), fields(model = %self.config.model, request_id))]
    async fn complete(&self, request: &GenerationRequest) -> Result<Completion, BackendError> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        debug!(
            request_id = %request_id,
            prompt_length = request.prompt.len(),
            max_tokens = request.max_tokens,
            "Sending messages request"
        );

        let body = MessageRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system_prompt.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt.as_str().to_string(),
            }],
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(AnthropicError::Http)?;

        let status = response.status();
        let text = response.text().await.map_err(AnthropicError::Http)?;

        if !status.is_success() {
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "Messages request failed"
            );
            return Ok(Self::handle_error_response(status, text)?);
        }

        let message: MessageResponse =
            serde_json::from_str(&text).map_err(AnthropicError::Json)?;

        let completion_text = message
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| {
                AnthropicError::EmptyCompletion("no text content block returned".to_string())
            })?;

        if let Some(ref usage) = message.usage {
            debug!(
                request_id = %request_id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Token usage"
            );
        }

        Ok(Completion {
            text: completion_text,
            model: message.model,
            token_usage: message.usage.map(|u| model_client::TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
            }),
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, BackendError> {
        // The messages endpoint rejects malformed requests with 400 while
        // still proving the API is reachable and the key is accepted.
        let body = MessageRequest {
            model: self.config.model.clone(),
            max_tokens: 1,
            temperature: 0.0,
            system: String::new(),
            messages: vec![Message {
                role: "user".to_string(),
                content: "ping".to_string(),
            }],
        };

        let start_time = std::time::Instant::now();
        let response = timeout(
            Duration::from_secs(self.config.health_check_timeout_seconds),
            self.client
                .post(self.messages_url())
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| AnthropicError::Timeout {
            seconds: start_time.elapsed().as_secs(),
        })?
        .map_err(AnthropicError::Http)?;

        match response.status() {
            StatusCode::OK | StatusCode::BAD_REQUEST => Ok(HealthStatus::Up),
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
        "anthropic"
    }
}
