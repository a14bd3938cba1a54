// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared domain types for the Gather AI service layer
//!
//! This crate provides common types that are shared across multiple crates
//! in the Gather AI workspace, avoiding circular dependencies. All domain
//! data crosses the AI boundary as these plain records; persistence is the
//! caller's responsibility.

pub mod conversation;
pub mod profile;
pub mod records;

pub use conversation::{ConversationTurn, TurnRole};
pub use profile::{
    ActivityLevel, CommunitySize, ExperienceLevel, MeetingFormat, PriceRange, TimeCommitment,
    UserPreferenceProfile,
};
pub use records::{
    ApprovalStatus, Community, ContentItem, Event, EventFormat, MemberRole, Membership, Person,
    Report, ReportStatus,
};
