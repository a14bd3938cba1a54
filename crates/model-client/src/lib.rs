// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Generic model backend traits and request types
//!
//! This crate provides the common abstraction over hosted text-generation
//! providers. The gateway layer targets this trait so providers can be
//! swapped without changing caller-facing signatures.
//!
//! # Core Abstractions
//!
//! - **`ModelBackend` Trait**: Common interface for hosted text-generation
//!   providers with async support
//! - **`GenerationRequest`**: Transient per-call request, never persisted
//! - **Health Check System**: Standardized health status reporting
//! - **Error Handling**: `BackendError` types for the failure scenarios a
//!   hosted provider can produce

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod health;
pub mod request;

pub use health::*;
pub use request::*;

/// Generic trait for hosted text-generation backends
///
/// Implementations wrap one provider's wire format. A backend performs a
/// single completion call per invocation; retry and fallback policy live in
/// the gateway, not here.
pub trait ModelBackend: Send + Sync {
    /// Issue one text-completion call against the provider
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, rate limiting, authentication
    /// failure, or an unparseable provider response
    fn complete(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Completion, BackendError>> + Send;

    /// Check the health of this backend
    ///
    /// # Errors
    ///
    /// Returns an error if the health check itself fails
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, BackendError>> + Send;

    /// Get the name/identifier of this backend
    fn name(&self) -> &'static str;
}

/// Which backend a gateway call should target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The preferred provider, tried first
    #[default]
    Primary,
    /// The provider used when the primary fails
    Fallback,
}

impl BackendKind {
    /// Lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

/// Common errors that can occur when calling a model backend
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Invalid response format
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// Service unavailable
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Backend independent error
    #[error(transparent)]
    Custom { error: anyhow::Error },
}

impl BackendError {
    /// Create an HTTP error
    pub fn http<T: ToString>(message: T) -> Self {
        Self::Http {
            message: message.to_string(),
        }
    }

    /// Create an authentication error
    pub fn authentication<T: ToString>(message: T) -> Self {
        Self::Authentication {
            message: message.to_string(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response<T: ToString>(message: T) -> Self {
        Self::InvalidResponse {
            message: message.to_string(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable<T: ToString>(message: T) -> Self {
        Self::ServiceUnavailable {
            message: message.to_string(),
        }
    }

    /// Create a configuration error
    pub fn configuration<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Check if this error indicates a temporary failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::Timeout { .. }
                | Self::ServiceUnavailable { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Check if this error indicates an authentication problem
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
