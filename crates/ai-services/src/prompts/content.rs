// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Content generation templates

/// Prompt for a community post
pub fn community_post(
    topic: &str,
    community_type: &str,
    tone: &str,
    keywords: &[String],
    target_audience: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Write a post for a {community_type} community about \"{topic}\". \
         Use a {tone} tone."
    );
    if !keywords.is_empty() {
        prompt.push_str(&format!(
            "\nWork in these keywords naturally: {}.",
            keywords.join(", ")
        ));
    }
    if let Some(audience) = target_audience {
        prompt.push_str(&format!("\nThe post is aimed at {audience}."));
    }
    prompt
}

/// Prompt for an event description
pub fn event_description(
    title: &str,
    event_type: &str,
    format: &str,
    duration_minutes: Option<u32>,
    skill_level: Option<&str>,
    target_audience: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Write a description for \"{title}\", a {format} {event_type} event. \
         Make it inviting and concrete about what attendees will get."
    );
    if let Some(minutes) = duration_minutes {
        prompt.push_str(&format!("\nThe event runs for {minutes} minutes."));
    }
    if let Some(level) = skill_level {
        prompt.push_str(&format!("\nIt suits {level} participants."));
    }
    if let Some(audience) = target_audience {
        prompt.push_str(&format!("\nIt is aimed at {audience}."));
    }
    prompt
}

/// Prompt for a community guideline set
pub fn community_guidelines(community_type: &str, focus_areas: &[String]) -> String {
    let mut prompt = format!(
        "Draft community guidelines for a {community_type} community. \
         Keep each rule short, positive, and enforceable."
    );
    if !focus_areas.is_empty() {
        prompt.push_str(&format!(
            "\nGive extra attention to: {}.",
            focus_areas.join(", ")
        ));
    }
    prompt
}

/// Prompt for discussion starter questions
pub fn discussion_starters(topic: &str, community_type: &str, count: usize) -> String {
    format!(
        "Suggest {count} discussion starter questions about \"{topic}\" for a \
         {community_type} community. Number them, one per line, and make each \
         one open-ended."
    )
}

/// Prompt for a content rewrite
pub fn improve_content(content: &str, goal: &str) -> String {
    format!(
        "Rewrite the following content to {goal}. Preserve the author's \
         meaning and voice. Return only the rewritten text.\n\n{content}"
    )
}

/// Prompt for hashtag extraction
pub fn extract_hashtags(content: &str, count: usize) -> String {
    format!(
        "Suggest {count} hashtags for the following content. Return them \
         space-separated, each starting with #.\n\n{content}"
    )
}
