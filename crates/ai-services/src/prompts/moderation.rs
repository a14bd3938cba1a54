// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Moderation templates
//!
//! The moderation prompt embeds user-history signals so the model's
//! decision is context-aware; the taxonomy itself is enforced by the
//! schema, not the prompt.

use crate::moderation::{ModerationContext, ModerationDecision, ModerationVerdict, UserHistory};

/// Prompt for a moderation decision
pub fn moderate_content(content: &str, context: &ModerationContext) -> String {
    let mut prompt = format!(
        "You are moderating a {} on a community platform. Decide whether to \
         approve, flag, or reject it.",
        if context.content_type.is_empty() {
            "piece of content"
        } else {
            &context.content_type
        }
    );

    if let Some(ref guidelines) = context.community_guidelines {
        prompt.push_str(&format!("\n\nCommunity guidelines:\n{guidelines}"));
    }
    if let Some(ref history) = context.user_history {
        prompt.push_str(&format!(
            "\n\nAuthor history: {} prior violations, account {} days old, \
             author reported {} times before.",
            history.violation_count, history.account_age_days, history.report_count
        ));
    }
    if context.report_count > 0 {
        prompt.push_str(&format!(
            "\nThis content has been reported {} time{}.",
            context.report_count,
            if context.report_count == 1 { "" } else { "s" }
        ));
    }

    prompt.push_str(&format!("\n\nContent to moderate:\n{content}"));
    prompt
}

/// Prompt for a content quality analysis
pub fn content_quality(content: &str, content_type: &str) -> String {
    format!(
        "Assess the quality of this {content_type} for a community platform. \
         Consider clarity, usefulness, and how likely it is to spark \
         discussion.\n\n{content}"
    )
}

/// Prompt for spam detection
pub fn detect_spam(content: &str, user_history: Option<&UserHistory>) -> String {
    let mut prompt = "Judge whether the following content is spam. Look for \
                      promotional language, repeated links, and content \
                      unrelated to the community."
        .to_string();
    if let Some(history) = user_history {
        prompt.push_str(&format!(
            "\nAuthor signals: account {} days old, {} prior violations, \
             reported {} times.",
            history.account_age_days, history.violation_count, history.report_count
        ));
    }
    prompt.push_str(&format!("\n\nContent:\n{content}"));
    prompt
}

/// Prompt for a moderation activity summary
pub fn moderation_summary(decisions: &[ModerationDecision], timeframe: &str) -> String {
    let approved = count_verdict(decisions, ModerationVerdict::Approve);
    let flagged = count_verdict(decisions, ModerationVerdict::Flag);
    let rejected = count_verdict(decisions, ModerationVerdict::Reject);
    let human_review = decisions.iter().filter(|d| d.requires_human_review).count();

    let mut categories: Vec<&str> = decisions
        .iter()
        .flat_map(|d| d.categories.iter().map(String::as_str))
        .collect();
    categories.sort_unstable();
    categories.dedup();

    format!(
        "Write a short moderation summary for {timeframe}. Out of {} \
         decisions: {approved} approved, {flagged} flagged, {rejected} \
         rejected, {human_review} sent for human review. Categories seen: \
         {}. Highlight trends a community admin should know about.",
        decisions.len(),
        if categories.is_empty() {
            "none".to_string()
        } else {
            categories.join(", ")
        }
    )
}

fn count_verdict(decisions: &[ModerationDecision], verdict: ModerationVerdict) -> usize {
    decisions.iter().filter(|d| d.decision == verdict).count()
}

/// Prompt for suggesting guidelines from observed issues
pub fn suggest_guidelines(community_type: &str, common_issues: &[String]) -> String {
    let mut prompt = format!(
        "Suggest community guidelines for a {community_type} community that \
         has been having moderation problems."
    );
    if !common_issues.is_empty() {
        prompt.push_str(&format!(
            "\nThe most common issues have been: {}.",
            common_issues.join(", ")
        ));
    }
    prompt.push_str("\nEach rule should directly address a recurring issue.");
    prompt
}
