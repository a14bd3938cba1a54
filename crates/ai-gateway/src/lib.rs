// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model gateway for the Gather AI service layer
//!
//! This crate wraps two interchangeable hosted text-generation backends
//! behind one client with a fixed fallback policy: a failed call against the
//! primary backend is retried exactly once against the fallback with
//! identical parameters, and a schema-validation failure on a structured
//! call consumes that same single attempt. If the fallback also fails the
//! error propagates as a `GenerationFailure` carrying the final cause.
//!
//! # Components
//!
//! - [`AiClient`]: the gateway over a primary and a fallback backend
//! - [`ModelGateway`]: the trait domain services program against
//! - [`ResponseSchema`]: declarative shapes for structured generation
//! - [`analyze_content`]: fixed-template sentiment/toxicity/quality analysis
//! - [`GatewayConfig`]: YAML configuration and production wiring

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod schema;

pub use analysis::{AnalysisKind, ContentAnalysis, analyze_content};
pub use client::{AiClient, GenerationOptions, ModelGateway};
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use schema::{FieldKind, FieldSpec, ResponseSchema, extract_json_payload};
