// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Hosted text-generation provider implementations
//!
//! This crate implements the [`model_client::ModelBackend`] trait for two
//! interchangeable hosted providers:
//!
//! - [`OpenAiCompatBackend`]: any provider exposing the OpenAI
//!   `chat/completions` wire format
//! - [`AnthropicBackend`]: the Anthropic `v1/messages` wire format
//!
//! Each backend performs a single completion call per invocation. Fallback
//! between backends is the gateway's concern, not implemented here.

pub mod anthropic;
pub mod openai_compat;

pub use anthropic::{AnthropicBackend, AnthropicConfig, AnthropicError};
pub use openai_compat::{OpenAiCompatBackend, OpenAiCompatConfig, OpenAiCompatError};
