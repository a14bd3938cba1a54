// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prompt templates
//!
//! Every template is a pure `(params) -> String` function so expected
//! substrings can be unit-tested without touching the network. Schema
//! instructions are appended by the gateway, not here.

pub mod assistant;
pub mod content;
pub mod moderation;
pub mod recommend;
pub mod search;
