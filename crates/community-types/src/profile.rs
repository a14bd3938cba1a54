// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! User preference profile types
//!
//! The preference profile is supplied by the caller on every request. The AI
//! layer may propose an updated profile in response to user feedback, but
//! persisting it is the caller's responsibility.

use serde::{Deserialize, Serialize};

/// Preferred community size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunitySize {
    /// Intimate groups, roughly under 50 members
    Small,
    /// Mid-sized communities
    Medium,
    /// Large communities with hundreds of members or more
    Large,
    /// No preference either way
    Any,
}

/// Preferred meeting format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingFormat {
    /// Remote-only participation
    Online,
    /// In-person participation
    Offline,
    /// Mix of remote and in-person
    Hybrid,
}

/// How active the user wants a community to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Occasional posts and events
    Low,
    /// Steady weekly activity
    Moderate,
    /// Daily discussion and frequent events
    High,
}

/// Self-reported experience in the user's areas of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// New to the subject
    Beginner,
    /// Some practical experience
    Intermediate,
    /// Deep experience, may want to mentor
    Advanced,
}

/// How much time the user can commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeCommitment {
    /// A few hours a month
    Casual,
    /// A few hours a week
    Regular,
    /// Daily involvement
    Dedicated,
}

/// Acceptable price range for paid events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRange {
    /// Free events only
    Free,
    /// Low-cost events
    Budget,
    /// No price constraint
    Any,
}

/// A user's preference profile, supplied by the caller per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferenceProfile {
    /// Topics the user cares about
    pub interests: Vec<String>,
    /// Preferred community size
    pub community_size: CommunitySize,
    /// Preferred meeting format
    pub format: MeetingFormat,
    /// Desired level of community activity
    pub activity_level: ActivityLevel,
    /// What the user hopes to get out of the platform
    pub goals: Vec<String>,
    /// Optional home location
    pub location: Option<String>,
    /// Self-reported experience level
    pub experience: ExperienceLevel,
    /// Available time commitment
    pub time_commitment: TimeCommitment,
    /// Acceptable price range for events
    pub price_range: PriceRange,
    /// Categories the user never wants to see
    #[serde(default)]
    pub excluded_categories: Vec<String>,
}

impl Default for UserPreferenceProfile {
    fn default() -> Self {
        Self {
            interests: Vec::new(),
            community_size: CommunitySize::Any,
            format: MeetingFormat::Hybrid,
            activity_level: ActivityLevel::Moderate,
            goals: Vec::new(),
            location: None,
            experience: ExperienceLevel::Beginner,
            time_commitment: TimeCommitment::Regular,
            price_range: PriceRange::Any,
            excluded_categories: Vec::new(),
        }
    }
}

impl UserPreferenceProfile {
    /// Check whether a category is on the user's exclusion list
    pub fn excludes(&self, category: &str) -> bool {
        self.excluded_categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }

    /// Render the profile as a compact summary suitable for prompt embedding
    pub fn prompt_summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.interests.is_empty() {
            parts.push(format!("interests: {}", self.interests.join(", ")));
        }
        parts.push(format!("community size: {:?}", self.community_size).to_lowercase());
        parts.push(format!("format: {:?}", self.format).to_lowercase());
        parts.push(format!("activity: {:?}", self.activity_level).to_lowercase());
        if !self.goals.is_empty() {
            parts.push(format!("goals: {}", self.goals.join(", ")));
        }
        if let Some(ref location) = self.location {
            parts.push(format!("location: {location}"));
        }
        parts.push(format!("experience: {:?}", self.experience).to_lowercase());
        parts.push(format!("time commitment: {:?}", self.time_commitment).to_lowercase());
        parts.push(format!("price range: {:?}", self.price_range).to_lowercase());
        if !self.excluded_categories.is_empty() {
            parts.push(format!(
                "excluded categories: {}",
                self.excluded_categories.join(", ")
            ));
        }
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserPreferenceProfile {
        UserPreferenceProfile {
            interests: vec!["photography".to_string(), "hiking".to_string()],
            community_size: CommunitySize::Small,
            format: MeetingFormat::Offline,
            activity_level: ActivityLevel::High,
            goals: vec!["meet people".to_string()],
            location: Some("Lisbon".to_string()),
            experience: ExperienceLevel::Intermediate,
            time_commitment: TimeCommitment::Regular,
            price_range: PriceRange::Budget,
            excluded_categories: vec!["Crypto".to_string()],
        }
    }

    #[test]
    fn exclusion_check_is_case_insensitive() {
        let profile = sample_profile();
        assert!(profile.excludes("crypto"));
        assert!(profile.excludes("CRYPTO"));
        assert!(!profile.excludes("photography"));
    }

    #[test]
    fn prompt_summary_includes_key_fields() {
        let summary = sample_profile().prompt_summary();
        assert!(summary.contains("photography, hiking"));
        assert!(summary.contains("community size: small"));
        assert!(summary.contains("location: Lisbon"));
        assert!(summary.contains("excluded categories: Crypto"));
    }

    #[test]
    fn serde_round_trip_uses_snake_case() {
        let json = serde_json::to_string(&MeetingFormat::Online).unwrap();
        assert_eq!(json, "\"online\"");

        let parsed: CommunitySize = serde_json::from_str("\"small\"").unwrap();
        assert_eq!(parsed, CommunitySize::Small);
    }

    #[test]
    fn default_profile_has_no_exclusions() {
        let profile = UserPreferenceProfile::default();
        assert!(profile.interests.is_empty());
        assert!(profile.excluded_categories.is_empty());
        assert_eq!(profile.community_size, CommunitySize::Any);
    }
}
