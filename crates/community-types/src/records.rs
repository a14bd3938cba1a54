// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Domain records consumed by the AI layer
//!
//! These records mirror rows in the platform's persistence service. The AI
//! layer never queries that service itself; callers fetch candidates and pass
//! them across the boundary as these plain structs. Enum-valued columns
//! (role, approval status, report status, event format) are proper closed
//! enums so invalid values are caught at the boundary instead of being
//! silently interpolated into a model prompt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A community a user can browse, join, or manage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    /// Stable identifier from the persistence service
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description shown on discovery surfaces
    pub description: String,
    /// Primary category tag
    pub category: String,
    /// Current member count
    pub member_count: u32,
    /// Free-form topic tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Format of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    /// Remote-only event
    Online,
    /// In-person event
    Offline,
    /// Mixed remote and in-person
    Hybrid,
}

impl EventFormat {
    /// Parse a format string as used by callers and prompts
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Some(Self::Online),
            "offline" => Some(Self::Offline),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    /// Lowercase label used in prompts and serialized payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Hybrid => "hybrid",
        }
    }
}

/// An event a user can discover and RSVP to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identifier from the persistence service
    pub id: String,
    /// Event title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Category tag
    pub category: String,
    /// Delivery format
    pub format: EventFormat,
    /// Scheduled start time
    pub starts_at: DateTime<Utc>,
    /// Venue or join link, when known
    pub location: Option<String>,
    /// Ticket price, absent for free events
    pub price: Option<f64>,
}

/// A person who can be recommended as a connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identifier from the persistence service
    pub id: String,
    /// Display name
    pub name: String,
    /// Declared interests
    #[serde(default)]
    pub interests: Vec<String>,
    /// Communities shared with the requesting user
    #[serde(default)]
    pub mutual_communities: Vec<String>,
}

/// A piece of user-generated content (post, comment, announcement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Stable identifier from the persistence service
    pub id: String,
    /// Title or first line
    pub title: String,
    /// Body text
    pub body: String,
    /// Category of the community it was posted in
    pub category: String,
    /// When the content was created
    pub created_at: DateTime<Utc>,
}

/// Role of a member within a community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Full administrative control
    Admin,
    /// Moderation powers without administration
    Moderator,
    /// Regular member
    Member,
}

/// Tri-state membership approval status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting review
    Pending,
    /// Approved membership
    Approved,
    /// Rejected membership
    Rejected,
}

/// A user's membership in a community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Member user id
    pub user_id: String,
    /// Community id
    pub community_id: String,
    /// Role within the community
    pub role: MemberRole,
    /// Approval state of the membership
    pub status: ApprovalStatus,
    /// When the membership was created
    pub joined_at: DateTime<Utc>,
}

/// Workflow status of a content or community report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Newly filed, not yet looked at
    Pending,
    /// Under review by a moderator
    Reviewing,
    /// Reviewed and acted upon
    Resolved,
    /// Reviewed and dismissed
    Dismissed,
}

impl ReportStatus {
    /// Whether the report still needs moderator attention
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Reviewing)
    }
}

/// A report filed against content or a community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Stable identifier from the persistence service
    pub id: String,
    /// Id of the reported content or community
    pub target_id: String,
    /// Reporter-supplied reason
    pub reason: String,
    /// Workflow status
    pub status: ReportStatus,
    /// When the report was filed
    pub created_at: DateTime<Utc>,
}
