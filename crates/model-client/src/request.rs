// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Generation request and completion types
//!
//! A [`GenerationRequest`] is created per call and never persisted. The
//! [`Prompt`] newtype guarantees at construction time that a request can
//! never carry an empty prompt, so that invariant does not need re-checking
//! downstream.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BackendError;

/// Default system persona used when the caller supplies none
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant for a community platform. Be concise, friendly, and accurate.";

/// A non-empty prompt string, validated at construction
///
/// Uses `Box<str>` internally; immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt(Box<str>);

impl Prompt {
    /// Create a new prompt from any string-like input
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or whitespace-only
    pub fn new(value: impl Into<String>) -> Result<Self, BackendError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(BackendError::configuration(
                "Prompt cannot be empty or whitespace-only",
            ));
        }
        Ok(Self(s.into_boxed_str()))
    }

    /// Get the prompt text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the prompt in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false by construction, provided for API completeness
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Prompt {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Prompt {
    type Error = BackendError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Prompt> for String {
    fn from(value: Prompt) -> Self {
        value.0.into_string()
    }
}

/// A transient text-completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user prompt, guaranteed non-empty
    pub prompt: Prompt,
    /// System persona text
    pub system_prompt: String,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create a request with default system prompt and sampling parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is empty
    pub fn new(prompt: impl Into<String>) -> Result<Self, BackendError> {
        Ok(Self {
            prompt: Prompt::new(prompt)?,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        })
    }

    /// Set the system prompt
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
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
}

/// Token usage statistics reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens consumed by the call
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// The result of one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text
    pub text: String,
    /// Provider model identifier that produced the text
    pub model: String,
    /// Token usage, when the provider reports it
    pub token_usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_rejects_empty_input() {
        assert!(Prompt::new("").is_err());
        assert!(Prompt::new("   \t\n  ").is_err());
        assert!(Prompt::new("hello").is_ok());
    }

    #[test]
    fn prompt_preserves_content() {
        let prompt = Prompt::new("write a post about hiking").unwrap();
        assert_eq!(prompt.as_str(), "write a post about hiking");
        assert_eq!(prompt.to_string(), "write a post about hiking");
        assert!(!prompt.is_empty());
    }

    #[test]
    fn prompt_parses_from_str() {
        let parsed: Prompt = "hello".parse().unwrap();
        assert_eq!(parsed.as_str(), "hello");
        assert!("  ".parse::<Prompt>().is_err());
    }

    #[test]
    fn request_defaults() {
        let request = GenerationRequest::new("hi").unwrap();
        assert_eq!(request.max_tokens, 1000);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn request_builder_setters() {
        let request = GenerationRequest::new("hi")
            .unwrap()
            .with_system_prompt("be terse")
            .with_max_tokens(50)
            .with_temperature(0.2);
        assert_eq!(request.system_prompt, "be terse");
        assert_eq!(request.max_tokens, 50);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 40,
            completion_tokens: 10,
        };
        assert_eq!(usage.total(), 50);
    }
}
