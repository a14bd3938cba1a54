// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Gateway configuration
//!
//! Loads a YAML file describing both backends and builds the production
//! [`AiClient`] wiring: an OpenAI-compatible primary with an Anthropic
//! fallback. API keys may be given inline or via environment variable
//! references of the form `${VAR_NAME}`.

use model_backends::{AnthropicBackend, AnthropicConfig, OpenAiCompatBackend, OpenAiCompatConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::AiClient;
use crate::error::{GatewayError, GatewayResult};

/// Configuration for the OpenAI-compatible primary backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryBackendConfig {
    /// Base URL for the API
    #[serde(default = "default_primary_base_url")]
    pub base_url: String,
    /// API key, inline or as `${VAR_NAME}`
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_primary_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Configuration for the Anthropic fallback backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackBackendConfig {
    /// Base URL for the API
    #[serde(default = "default_fallback_base_url")]
    pub base_url: String,
    /// API key, inline or as `${VAR_NAME}`
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_fallback_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_primary_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_primary_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_fallback_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_fallback_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Primary backend settings
    pub primary: PrimaryBackendConfig,
    /// Fallback backend settings
    pub fallback: FallbackBackendConfig,
}

impl GatewayConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// fails validation
    pub async fn from_file(path: &str) -> GatewayResult<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::config(format!("cannot read {path}: {e}")))?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        info!(path = %path, "Loaded gateway configuration");
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error for empty keys or models, or a zero timeout
    pub fn validate(&self) -> GatewayResult<()> {
        if self.primary.api_key.trim().is_empty() {
            return Err(GatewayError::config("primary api_key cannot be empty"));
        }
        if self.fallback.api_key.trim().is_empty() {
            return Err(GatewayError::config("fallback api_key cannot be empty"));
        }
        if self.primary.model.trim().is_empty() {
            return Err(GatewayError::config("primary model cannot be empty"));
        }
        if self.fallback.model.trim().is_empty() {
            return Err(GatewayError::config("fallback model cannot be empty"));
        }
        if self.primary.timeout_seconds == 0 || self.fallback.timeout_seconds == 0 {
            return Err(GatewayError::config("timeout_seconds must be nonzero"));
        }
        Ok(())
    }

    /// Build the production gateway from this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable reference cannot be
    /// resolved or a backend rejects its configuration
    pub fn build(&self) -> GatewayResult<AiClient<OpenAiCompatBackend, AnthropicBackend>> {
        let primary = OpenAiCompatBackend::new(OpenAiCompatConfig {
            base_url: self.primary.base_url.clone(),
            api_key: resolve_secret(&self.primary.api_key)?,
            model: self.primary.model.clone(),
            timeout_seconds: self.primary.timeout_seconds,
            health_check_timeout_seconds: 5,
        })
        .map_err(|e| GatewayError::config(format!("primary backend: {e}")))?;

        let fallback = AnthropicBackend::new(AnthropicConfig {
            base_url: self.fallback.base_url.clone(),
            api_key: resolve_secret(&self.fallback.api_key)?,
            model: self.fallback.model.clone(),
            timeout_seconds: self.fallback.timeout_seconds,
            health_check_timeout_seconds: 5,
        })
        .map_err(|e| GatewayError::config(format!("fallback backend: {e}")))?;

        Ok(AiClient::new(primary, fallback))
    }
}

/// Resolve `${VAR_NAME}` references against the environment
fn resolve_secret(value: &str) -> GatewayResult<String> {
    if let Some(name) = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        std::env::var(name)
            .map_err(|_| GatewayError::config(format!("environment variable {name} is not set")))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn valid_yaml() -> &'static str {
        r#"
primary:
  api_key: "sk-test"
  model: "gpt-4o-mini"
fallback:
  api_key: "anthropic-test"
"#
    }

    #[tokio::test]
    async fn load_from_file_applies_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(valid_yaml().as_bytes()).unwrap();

        let config = GatewayConfig::from_file(file.path().to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(config.primary.base_url, "https://api.openai.com/v1");
        assert_eq!(config.fallback.model, "claude-3-5-haiku-latest");
        assert_eq!(config.primary.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn missing_file_is_config_error() {
        let error = GatewayConfig::from_file("/nonexistent/gateway.yml")
            .await
            .unwrap_err();
        assert!(error.is_config_error());
    }

    #[test]
    fn validation_rejects_empty_key() {
        let mut config: GatewayConfig = serde_yaml::from_str(valid_yaml()).unwrap();
        config.fallback.api_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_timeout() {
        let mut config: GatewayConfig = serde_yaml::from_str(valid_yaml()).unwrap();
        config.primary.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn build_constructs_both_backends() {
        let config: GatewayConfig = serde_yaml::from_str(valid_yaml()).unwrap();
        assert!(config.build().is_ok());
    }

    #[test]
    fn resolve_secret_passes_literals_through() {
        assert_eq!(resolve_secret("sk-literal").unwrap(), "sk-literal");
    }

    #[test]
    fn resolve_secret_reports_missing_variable() {
        let error = resolve_secret("${GATHER_AI_TEST_UNSET_VAR}").unwrap_err();
        assert!(error.to_string().contains("GATHER_AI_TEST_UNSET_VAR"));
    }
}
