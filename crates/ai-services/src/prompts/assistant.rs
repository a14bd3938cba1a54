// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Conversational assistant templates
//!
//! The conversation template receives an already-windowed slice of recent
//! turns; bounding the transcript is the session's job, not the template's.

use community_types::{ConversationTurn, UserPreferenceProfile};

use crate::assistant::ConversationContext;
use crate::recommend::Recommendation;

/// Prompt for one assistant reply
pub fn conversation(
    recent_turns: &[ConversationTurn],
    preferences: Option<&UserPreferenceProfile>,
    context: ConversationContext,
    message: &str,
) -> String {
    let mut prompt = format!(
        "You are the assistant for a community platform. The user is on the \
         {} page. Help them find communities, events, and people, and decide \
         what the interface should do next.",
        context.as_str()
    );

    if let Some(profile) = preferences {
        prompt.push_str(&format!("\n\nUser preferences: {}.", profile.prompt_summary()));
    }

    if !recent_turns.is_empty() {
        let transcript: Vec<String> = recent_turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
            .collect();
        prompt.push_str(&format!(
            "\n\nRecent conversation:\n{}",
            transcript.join("\n")
        ));
    }

    prompt.push_str(&format!("\n\nUser message: {message}"));
    prompt
}

/// Prompt for interpreting free-text feedback into updated preferences
pub fn feedback(
    feedback_text: &str,
    current_preferences: &UserPreferenceProfile,
    last_recommendations: &[Recommendation],
) -> String {
    let mut prompt = format!(
        "The user gave feedback on their recommendations. Interpret it \
         against known patterns (\"too big\" lowers community size, \"not \
         interested in X\" adds an excluded category) and produce the full \
         updated preference profile.\n\nCurrent preferences: {}.\n\n\
         Feedback: {feedback_text}",
        current_preferences.prompt_summary()
    );

    if !last_recommendations.is_empty() {
        let shown: Vec<String> = last_recommendations
            .iter()
            .map(|r| format!("- {} ({})", r.id, r.reasoning))
            .collect();
        prompt.push_str(&format!(
            "\n\nRecommendations the feedback refers to:\n{}",
            shown.join("\n")
        ));
    }

    prompt.push_str(
        "\n\nSet new_recommendations to true only if the preference change \
         would alter what gets recommended.",
    );
    prompt
}
