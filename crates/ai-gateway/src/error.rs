// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for gateway operations
//!
//! The taxonomy separates caller mistakes ([`GatewayError::InvalidParameters`],
//! raised before any model call and never retried) from generation failures
//! (backend or schema problems, subject to the single fallback attempt before
//! surfacing).

use model_client::BackendError;
use thiserror::Error;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors produced by the model gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller supplied a missing required field or an out-of-enum value;
    /// raised before any model call is attempted
    #[error("Invalid parameters: {message}")]
    InvalidParameters { message: String },

    /// Both backends were exhausted without producing a valid result
    #[error("Generation failed: {message}")]
    GenerationFailure {
        message: String,
        #[source]
        source: Option<BackendError>,
    },

    /// A structured response did not match the declared schema
    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },

    /// Configuration file not found or invalid
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {message}")]
    Json { message: String },

    /// YAML parsing error
    #[error("YAML error: {message}")]
    Yaml { message: String },

    /// I/O error (file operations)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Custom error with context
    #[error("Custom error: {0}")]
    Custom(#[from] anyhow::Error),
}

impl GatewayError {
    /// Create an invalid parameters error
    pub fn invalid_parameters<T: ToString>(message: T) -> Self {
        Self::InvalidParameters {
            message: message.to_string(),
        }
    }

    /// Create a generation failure with its final backend cause
    pub fn generation_failure<T: ToString>(message: T, source: Option<BackendError>) -> Self {
        Self::GenerationFailure {
            message: message.to_string(),
            source,
        }
    }

    /// Create a schema validation error
    pub fn schema_validation<T: ToString>(message: T) -> Self {
        Self::SchemaValidation {
            message: message.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config<T: ToString>(message: T) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }

    /// Create a JSON error
    pub fn json<T: ToString>(message: T) -> Self {
        Self::Json {
            message: message.to_string(),
        }
    }

    /// Create a YAML error
    pub fn yaml<T: ToString>(message: T) -> Self {
        Self::Yaml {
            message: message.to_string(),
        }
    }

    /// Create an I/O error
    pub fn io<T: ToString>(message: T) -> Self {
        Self::Io {
            message: message.to_string(),
        }
    }

    /// Check if this error was raised before any model call
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, Self::InvalidParameters { .. })
    }

    /// Check if this error means both backends were exhausted
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationFailure { .. })
    }

    /// Check if this error indicates a configuration problem
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Yaml { .. } | Self::Io { .. }
        )
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for GatewayError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
