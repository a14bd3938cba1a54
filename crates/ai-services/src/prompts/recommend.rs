// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Recommendation templates
//!
//! Candidate pools are rendered as numbered lists with stable ids; the
//! model is asked to rank by id so results can be joined back to the
//! caller's objects.

use community_types::{Community, ContentItem, Event, Person, UserPreferenceProfile};

use crate::recommend::{ActivityRecord, Recommendation, RecommendOptions};

fn ranking_instructions(profile: &UserPreferenceProfile, options: &RecommendOptions) -> String {
    format!(
        "User profile: {}.\n\
         Rank the candidates by fit with the profile and return at most {} \
         of them, best first, citing candidate ids. Weight variety at {:.1} \
         and recency at {:.1} relative to raw relevance. Skip candidates \
         that do not fit at all.",
        profile.prompt_summary(),
        options.max_recommendations,
        options.diversity_weight,
        options.recency_weight
    )
}

/// Prompt for inferring an interest profile from an activity log
pub fn interest_analysis(activity: &[ActivityRecord]) -> String {
    let lines: Vec<String> = activity
        .iter()
        .map(|entry| {
            let category = entry
                .category
                .as_deref()
                .map(|c| format!(" [{c}]"))
                .unwrap_or_default();
            format!(
                "- {} {} on {}{category}",
                entry.action,
                entry.target,
                entry.timestamp.format("%Y-%m-%d")
            )
        })
        .collect();

    format!(
        "Infer the user's interests from their recent activity. Be specific \
         about topics rather than generic.\n\nActivity log:\n{}",
        lines.join("\n")
    )
}

/// Prompt for ranking community candidates
pub fn community_recommendations(
    profile: &UserPreferenceProfile,
    candidates: &[&Community],
    options: &RecommendOptions,
) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .map(|c| {
            format!(
                "- id: {} | {} | category: {} | {} members | {}",
                c.id, c.name, c.category, c.member_count, c.description
            )
        })
        .collect();

    format!(
        "Recommend communities for this user.\n{}\n\nCandidates:\n{}",
        ranking_instructions(profile, options),
        lines.join("\n")
    )
}

/// Prompt for ranking event candidates
pub fn event_recommendations(
    profile: &UserPreferenceProfile,
    candidates: &[&Event],
    options: &RecommendOptions,
) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .map(|e| {
            let price = e
                .price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "free".to_string());
            format!(
                "- id: {} | {} | category: {} | {} | starts {} | price: {price}",
                e.id,
                e.title,
                e.category,
                e.format.as_str(),
                e.starts_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect();

    format!(
        "Recommend events for this user.\n{}\n\nCandidates:\n{}",
        ranking_instructions(profile, options),
        lines.join("\n")
    )
}

/// Prompt for ranking content candidates
pub fn content_recommendations(
    profile: &UserPreferenceProfile,
    candidates: &[&ContentItem],
    options: &RecommendOptions,
) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .map(|c| {
            format!(
                "- id: {} | {} | category: {} | posted {}",
                c.id,
                c.title,
                c.category,
                c.created_at.format("%Y-%m-%d")
            )
        })
        .collect();

    format!(
        "Recommend posts and discussions for this user.\n{}\n\nCandidates:\n{}",
        ranking_instructions(profile, options),
        lines.join("\n")
    )
}

/// Prompt for ranking people as potential connections
pub fn people_recommendations(
    profile: &UserPreferenceProfile,
    candidates: &[&Person],
    options: &RecommendOptions,
) -> String {
    let lines: Vec<String> = candidates
        .iter()
        .map(|p| {
            format!(
                "- id: {} | {} | interests: {} | shared communities: {}",
                p.id,
                p.name,
                p.interests.join(", "),
                p.mutual_communities.len()
            )
        })
        .collect();

    format!(
        "Recommend people this user might want to connect with.\n{}\n\n\
         Candidates:\n{}",
        ranking_instructions(profile, options),
        lines.join("\n")
    )
}

/// Prompt for explaining one recommendation on demand
pub fn explain_recommendation(
    recommendation: &Recommendation,
    profile: &UserPreferenceProfile,
) -> String {
    format!(
        "A user with this profile: {}\nwas recommended item {} (score \
         {:.2}) because: {}.\nExplain in one or two friendly sentences, \
         addressed to the user, why this recommendation fits them.",
        profile.prompt_summary(),
        recommendation.id,
        recommendation.score,
        recommendation.reasoning
    )
}
