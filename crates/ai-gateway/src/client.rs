// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model gateway with provider fallback
//!
//! [`AiClient`] wraps a primary and a fallback backend behind one pair of
//! operations: free-text generation and schema-validated structured
//! generation. A call targeting the primary backend that fails for any
//! reason (transport, provider error, or schema mismatch) is retried exactly
//! once against the fallback with identical parameters. A call that starts
//! on the fallback gets no further retry.

use model_client::{
    BackendError, BackendKind, Completion, GenerationRequest, HealthCheckResult, HealthStatus,
    ModelBackend,
};
use serde_json::Value;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::schema::{ResponseSchema, extract_json_payload};

/// Per-call generation options
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// System persona text; `None` uses the default assistant persona
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate, must be greater than zero
    pub max_tokens: u32,
    /// Sampling temperature, range 0.0 to 2.0
    pub temperature: f32,
    /// Which backend the call starts on
    pub backend: BackendKind,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_tokens: 1000,
            temperature: 0.7,
            backend: BackendKind::Primary,
        }
    }
}

impl GenerationOptions {
    /// Set the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the maximum tokens for the response
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the backend the call starts on
    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    fn validate(&self) -> GatewayResult<()> {
        if self.max_tokens == 0 {
            return Err(GatewayError::invalid_parameters(
                "max_tokens must be greater than zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GatewayError::invalid_parameters(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// The gateway interface domain services program against
///
/// Services take an implementation of this trait instead of [`AiClient`]
/// directly so tests can substitute scripted stubs without any network.
pub trait ModelGateway: Send + Sync {
    /// Generate free text for a prompt
    fn generate_text(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> impl Future<Output = GatewayResult<String>> + Send;

    /// Generate a structured object validated against a schema
    ///
    /// The returned value is guaranteed to match the schema's declared shape
    /// exactly: all required fields present, no undeclared fields.
    fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        options: GenerationOptions,
    ) -> impl Future<Output = GatewayResult<Value>> + Send;
}

impl<T: ModelGateway + Sync> ModelGateway for &T {
    fn generate_text(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> impl Future<Output = GatewayResult<String>> + Send {
        (**self).generate_text(prompt, options)
    }

    fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        options: GenerationOptions,
    ) -> impl Future<Output = GatewayResult<Value>> + Send {
        (**self).generate_structured(prompt, schema, options)
    }
}

impl<T: ModelGateway + Send + Sync> ModelGateway for std::sync::Arc<T> {
    fn generate_text(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> impl Future<Output = GatewayResult<String>> + Send {
        (**self).generate_text(prompt, options)
    }

    fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        options: GenerationOptions,
    ) -> impl Future<Output = GatewayResult<Value>> + Send {
        (**self).generate_structured(prompt, schema, options)
    }
}

/// Outcome of a single backend attempt during structured generation
enum AttemptFailure {
    Backend(BackendError),
    Schema(GatewayError),
}

/// Model gateway over a primary and a fallback backend
#[derive(Debug)]
pub struct AiClient<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ModelBackend, F: ModelBackend> AiClient<P, F> {
    /// Create a gateway over the given backends
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// The ordered backends a call will attempt, at most two
    fn attempt_order(start: BackendKind) -> &'static [BackendKind] {
        match start {
            BackendKind::Primary => &[BackendKind::Primary, BackendKind::Fallback],
            BackendKind::Fallback => &[BackendKind::Fallback],
        }
    }

    fn backend_name(&self, kind: BackendKind) -> &'static str {
        match kind {
            BackendKind::Primary => self.primary.name(),
            BackendKind::Fallback => self.fallback.name(),
        }
    }

    async fn complete_on(
        &self,
        kind: BackendKind,
        request: &GenerationRequest,
    ) -> Result<Completion, BackendError> {
        match kind {
            BackendKind::Primary => self.primary.complete(request).await,
            BackendKind::Fallback => self.fallback.complete(request).await,
        }
    }

    fn build_request(&self, prompt: &str, options: &GenerationOptions) -> GatewayResult<GenerationRequest> {
        options.validate()?;
        let mut request = GenerationRequest::new(prompt)
            .map_err(|e| GatewayError::invalid_parameters(e.to_string()))?
            .with_max_tokens(options.max_tokens)
            .with_temperature(options.temperature);
        if let Some(ref system_prompt) = options.system_prompt {
            request = request.with_system_prompt(system_prompt.clone());
        }
        Ok(request)
    }

    /// Probe both backends, recording the status and timing of each
    pub async fn health_check(&self) -> Vec<(BackendKind, HealthCheckResult)> {
        let mut results = Vec::with_capacity(2);
        for kind in [BackendKind::Primary, BackendKind::Fallback] {
            let start_time = std::time::Instant::now();
            let status = match kind {
                BackendKind::Primary => self.primary.health_check().await,
                BackendKind::Fallback => self.fallback.health_check().await,
            };
            let status = status.unwrap_or_else(|e| HealthStatus::Down {
                reason: e.to_string(),
            });
            results.push((kind, HealthCheckResult::new(status, start_time.elapsed())));
        }
        results
    }
}

impl<P: ModelBackend, F: ModelBackend> ModelGateway for AiClient<P, F> {
    #[instrument(skip(self, prompt, options), fields(backend = options.backend.as_str(), request_id))]
    async fn generate_text(
        &self,
        prompt: &str,
        options: GenerationOptions,
    ) -> GatewayResult<String> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        let request = self.build_request(prompt, &options)?;
        let order = Self::attempt_order(options.backend);

        let mut last_error = None;
        for &kind in order {
            debug!(
                request_id = %request_id,
                backend = self.backend_name(kind),
                "Attempting text generation"
            );
            match self.complete_on(kind, &request).await {
                Ok(completion) => {
                    info!(
                        request_id = %request_id,
                        backend = self.backend_name(kind),
                        model = %completion.model,
                        "Text generation succeeded"
                    );
                    return Ok(completion.text);
                }
                Err(error) => {
                    warn!(
                        request_id = %request_id,
                        backend = self.backend_name(kind),
                        error = %error,
                        "Backend call failed"
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(GatewayError::generation_failure(
            "all backends exhausted",
            last_error,
        ))
    }

    #[instrument(skip(self, prompt, schema, options), fields(schema = schema.name, backend = options.backend.as_str(), request_id))]
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        options: GenerationOptions,
    ) -> GatewayResult<Value> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        let full_prompt = format!("{prompt}\n\n{}", schema.instructions());
        let request = self.build_request(&full_prompt, &options)?;
        let order = Self::attempt_order(options.backend);

        let mut last_failure = None;
        for &kind in order {
            debug!(
                request_id = %request_id,
                backend = self.backend_name(kind),
                schema = schema.name,
                "Attempting structured generation"
            );
            match self.complete_on(kind, &request).await {
                Ok(completion) => {
                    // A schema mismatch consumes the same single fallback
                    // attempt as a backend failure.
                    match extract_json_payload(&completion.text)
                        .and_then(|value| schema.validate(&value).map(|()| value))
                    {
                        Ok(value) => {
                            info!(
                                request_id = %request_id,
                                backend = self.backend_name(kind),
                                schema = schema.name,
                                "Structured generation succeeded"
                            );
                            return Ok(value);
                        }
                        Err(error) => {
                            warn!(
                                request_id = %request_id,
                                backend = self.backend_name(kind),
                                error = %error,
                                "Response failed schema validation"
                            );
                            last_failure = Some(AttemptFailure::Schema(error));
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        request_id = %request_id,
                        backend = self.backend_name(kind),
                        error = %error,
                        "Backend call failed"
                    );
                    last_failure = Some(AttemptFailure::Backend(error));
                }
            }
        }

        Err(match last_failure {
            Some(AttemptFailure::Backend(error)) => {
                GatewayError::generation_failure("all backends exhausted", Some(error))
            }
            Some(AttemptFailure::Schema(error)) => GatewayError::generation_failure(
                format!("all backends exhausted, last failure: {error}"),
                None,
            ),
            None => GatewayError::generation_failure("no backend attempted", None),
        })
    }
}
