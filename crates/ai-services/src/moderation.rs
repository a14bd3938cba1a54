// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Moderation service
//!
//! All moderation judgment is delegated to the model; this service's
//! value-add is the fixed categorical taxonomy the schema forces the model
//! to choose from, and the user-history signals embedded into the prompt.
//! Decisions are pure request/response: enforcement is the caller's
//! responsibility.

use ai_gateway::{
    FieldKind, FieldSpec, GatewayError, GatewayResult, GenerationOptions, ModelGateway,
    ResponseSchema,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::prompts;

/// The closed set of content categories the model may assign
pub const MODERATION_CATEGORIES: [&str; 8] = [
    "harassment",
    "hate_speech",
    "spam",
    "violence",
    "sexual_content",
    "misinformation",
    "self_harm",
    "off_topic",
];

/// The moderation verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationVerdict {
    /// Content is acceptable
    Approve,
    /// Content needs moderator attention
    Flag,
    /// Content violates the guidelines
    Reject,
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor issue
    Low,
    /// Needs attention
    Medium,
    /// Serious violation
    High,
    /// Immediate action required
    Critical,
}

/// User-history signals embedded into the moderation prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHistory {
    /// Prior guideline violations
    pub violation_count: u32,
    /// Account age in days
    pub account_age_days: u32,
    /// Reports previously filed against this user
    pub report_count: u32,
}

/// Context supplied with a moderation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationContext {
    /// Kind of content (post, comment, event description)
    pub content_type: String,
    /// Guidelines text of the community the content was posted in
    pub community_guidelines: Option<String>,
    /// History signals for the author, when known
    pub user_history: Option<UserHistory>,
    /// How many times this specific content was reported
    pub report_count: u32,
}

/// A structured moderation decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationDecision {
    /// The verdict
    pub decision: ModerationVerdict,
    /// Model confidence, 0.0 to 1.0
    pub confidence: f64,
    /// Reasons supporting the verdict
    pub reasons: Vec<String>,
    /// Categories from [`MODERATION_CATEGORIES`]
    #[serde(default)]
    pub categories: Vec<String>,
    /// Suggested moderator follow-ups
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    /// Severity of the violation
    pub severity: Severity,
    /// Whether a human should confirm the decision
    pub requires_human_review: bool,
}

/// A content quality report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Quality score, 0.0 to 1.0
    pub score: f64,
    /// What the content does well
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Concrete improvement suggestions
    #[serde(default)]
    pub improvements: Vec<String>,
    /// Expected engagement, 0.0 to 1.0
    pub engagement_potential: f64,
}

/// A spam assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamAssessment {
    /// Whether the content is judged to be spam
    pub is_spam: bool,
    /// Model confidence, 0.0 to 1.0
    pub confidence: f64,
    /// Signals that informed the judgment
    #[serde(default)]
    pub indicators: Vec<String>,
    /// What the caller should do about it
    pub recommended_action: String,
}

fn moderation_schema() -> ResponseSchema {
    ResponseSchema::new(
        "moderation_decision",
        vec![
            FieldSpec::required("decision", FieldKind::Text, "approve, flag, or reject"),
            FieldSpec::required("confidence", FieldKind::Number, "confidence, 0.0 to 1.0"),
            FieldSpec::required("reasons", FieldKind::TextArray, "reasons for the decision"),
            FieldSpec::required(
                "categories",
                FieldKind::TextArray,
                "violation categories, only from: harassment, hate_speech, spam, violence, \
                 sexual_content, misinformation, self_harm, off_topic",
            ),
            FieldSpec::optional(
                "suggested_actions",
                FieldKind::TextArray,
                "follow-up actions for moderators",
            ),
            FieldSpec::required("severity", FieldKind::Text, "low, medium, high, or critical"),
            FieldSpec::required(
                "requires_human_review",
                FieldKind::Boolean,
                "whether a human should confirm",
            ),
        ],
    )
}

fn quality_schema() -> ResponseSchema {
    ResponseSchema::new(
        "quality_report",
        vec![
            FieldSpec::required("score", FieldKind::Number, "quality score, 0.0 to 1.0"),
            FieldSpec::required("strengths", FieldKind::TextArray, "what works well"),
            FieldSpec::required("improvements", FieldKind::TextArray, "concrete suggestions"),
            FieldSpec::required(
                "engagement_potential",
                FieldKind::Number,
                "expected engagement, 0.0 to 1.0",
            ),
        ],
    )
}

fn spam_schema() -> ResponseSchema {
    ResponseSchema::new(
        "spam_assessment",
        vec![
            FieldSpec::required("is_spam", FieldKind::Boolean, "whether this is spam"),
            FieldSpec::required("confidence", FieldKind::Number, "confidence, 0.0 to 1.0"),
            FieldSpec::required("indicators", FieldKind::TextArray, "spam signals found"),
            FieldSpec::required(
                "recommended_action",
                FieldKind::Text,
                "what to do with the content",
            ),
        ],
    )
}

fn suggest_guidelines_schema() -> ResponseSchema {
    ResponseSchema::new(
        "suggested_guidelines",
        vec![
            FieldSpec::required(
                "guidelines",
                FieldKind::ObjectArray(vec![
                    FieldSpec::required("title", FieldKind::Text, "short rule title"),
                    FieldSpec::required("description", FieldKind::Text, "what the rule means"),
                ]),
                "rules addressing the reported issues",
            ),
            FieldSpec::required(
                "enforcement_notes",
                FieldKind::Text,
                "how moderators should apply the rules",
            ),
        ],
    )
}

/// Guidelines suggested in response to observed issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedGuidelines {
    /// The suggested rules
    pub guidelines: Vec<crate::content::Guideline>,
    /// Notes on applying them
    pub enforcement_notes: String,
}

fn require_non_empty(name: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::invalid_parameters(format!(
            "{name} cannot be empty"
        )));
    }
    Ok(())
}

/// Moderates content through the model gateway
#[derive(Debug)]
pub struct ModerationService<G> {
    gateway: G,
}

impl<G: ModelGateway> ModerationService<G> {
    /// Create a service over the given gateway
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Produce a structured moderation decision for a piece of content
    ///
    /// The decision is not enforced here; the caller acts on it. A model
    /// response carrying an out-of-taxonomy verdict, severity, or category
    /// surfaces as a schema validation error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for empty content; otherwise propagates
    /// gateway failures
    #[instrument(skip(self, content, context), fields(content_type = %context.content_type))]
    pub async fn moderate_content(
        &self,
        content: &str,
        context: &ModerationContext,
    ) -> GatewayResult<ModerationDecision> {
        require_non_empty("content", content)?;

        let prompt = prompts::moderation::moderate_content(content, context);
        let value = self
            .gateway
            .generate_structured(
                &prompt,
                &moderation_schema(),
                GenerationOptions::default().with_temperature(0.2),
            )
            .await?;

        let decision: ModerationDecision = serde_json::from_value(value)
            .map_err(|e| GatewayError::schema_validation(e.to_string()))?;

        if let Some(unknown) = decision
            .categories
            .iter()
            .find(|c| !MODERATION_CATEGORIES.contains(&c.as_str()))
        {
            return Err(GatewayError::schema_validation(format!(
                "category '{unknown}' is not in the moderation taxonomy"
            )));
        }

        Ok(decision)
    }

    /// Analyze the quality of a piece of content
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for empty content or content type
    #[instrument(skip(self, content))]
    pub async fn analyze_content_quality(
        &self,
        content: &str,
        content_type: &str,
    ) -> GatewayResult<QualityReport> {
        require_non_empty("content", content)?;
        require_non_empty("content_type", content_type)?;

        let prompt = prompts::moderation::content_quality(content, content_type);
        let value = self
            .gateway
            .generate_structured(&prompt, &quality_schema(), GenerationOptions::default())
            .await?;
        Ok(serde_json::from_value(value).map_err(GatewayError::from)?)
    }

    /// Judge whether content is spam
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for empty content
    #[instrument(skip(self, content, user_history))]
    pub async fn detect_spam(
        &self,
        content: &str,
        user_history: Option<&UserHistory>,
    ) -> GatewayResult<SpamAssessment> {
        require_non_empty("content", content)?;

        let prompt = prompts::moderation::detect_spam(content, user_history);
        let value = self
            .gateway
            .generate_structured(
                &prompt,
                &spam_schema(),
                GenerationOptions::default().with_temperature(0.2),
            )
            .await?;
        Ok(serde_json::from_value(value).map_err(GatewayError::from)?)
    }

    /// Summarize a batch of moderation outcomes as prose
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty result set or timeframe
    #[instrument(skip(self, decisions))]
    pub async fn generate_moderation_summary(
        &self,
        decisions: &[ModerationDecision],
        timeframe: &str,
    ) -> GatewayResult<String> {
        require_non_empty("timeframe", timeframe)?;
        if decisions.is_empty() {
            return Err(GatewayError::invalid_parameters(
                "decisions cannot be empty",
            ));
        }

        let prompt = prompts::moderation::moderation_summary(decisions, timeframe);
        self.gateway
            .generate_text(&prompt, GenerationOptions::default())
            .await
    }

    /// Suggest guidelines addressing observed issues
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty community type
    #[instrument(skip(self, common_issues))]
    pub async fn suggest_community_guidelines(
        &self,
        community_type: &str,
        common_issues: &[String],
    ) -> GatewayResult<SuggestedGuidelines> {
        require_non_empty("community_type", community_type)?;

        let prompt = prompts::moderation::suggest_guidelines(community_type, common_issues);
        let value = self
            .gateway
            .generate_structured(
                &prompt,
                &suggest_guidelines_schema(),
                GenerationOptions::default(),
            )
            .await?;
        Ok(serde_json::from_value(value).map_err(GatewayError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGateway;

    fn decision_json() -> &'static str {
        r#"{
            "decision": "flag",
            "confidence": 0.85,
            "reasons": ["borderline personal attack"],
            "categories": ["harassment"],
            "suggested_actions": ["warn the author"],
            "severity": "medium",
            "requires_human_review": true
        }"#
    }

    fn sample_context() -> ModerationContext {
        ModerationContext {
            content_type: "comment".to_string(),
            community_guidelines: Some("Be respectful.".to_string()),
            user_history: Some(UserHistory {
                violation_count: 2,
                account_age_days: 40,
                report_count: 3,
            }),
            report_count: 1,
        }
    }

    #[tokio::test]
    async fn moderate_content_parses_full_decision() {
        let gateway = StubGateway::with_responses([decision_json()]);
        let service = ModerationService::new(&gateway);

        let decision = service
            .moderate_content("you are an idiot", &sample_context())
            .await
            .unwrap();

        assert_eq!(decision.decision, ModerationVerdict::Flag);
        assert_eq!(decision.severity, Severity::Medium);
        assert!(decision.requires_human_review);
        assert_eq!(decision.categories, vec!["harassment"]);
    }

    #[tokio::test]
    async fn moderation_prompt_embeds_history_signals() {
        let gateway = StubGateway::with_responses([decision_json()]);
        let service = ModerationService::new(&gateway);

        service
            .moderate_content("some content", &sample_context())
            .await
            .unwrap();

        let prompt = &gateway.prompts()[0];
        assert!(prompt.contains("some content"));
        assert!(prompt.contains("Be respectful."));
        assert!(prompt.contains("2 prior violations"));
        assert!(prompt.contains("reported 1 time"));
    }

    #[tokio::test]
    async fn out_of_taxonomy_category_is_rejected() {
        let gateway = StubGateway::with_responses([
            r#"{
                "decision": "flag",
                "confidence": 0.5,
                "reasons": ["r"],
                "categories": ["rudeness"],
                "severity": "low",
                "requires_human_review": false
            }"#,
        ]);
        let service = ModerationService::new(&gateway);

        let error = service
            .moderate_content("content", &ModerationContext::default())
            .await
            .unwrap_err();

        assert!(error.to_string().contains("rudeness"));
    }

    #[tokio::test]
    async fn unknown_verdict_is_a_schema_error() {
        let gateway = StubGateway::with_responses([
            r#"{
                "decision": "maybe",
                "confidence": 0.5,
                "reasons": ["r"],
                "categories": [],
                "severity": "low",
                "requires_human_review": false
            }"#,
        ]);
        let service = ModerationService::new(&gateway);

        let error = service
            .moderate_content("content", &ModerationContext::default())
            .await
            .unwrap_err();

        assert!(matches!(error, GatewayError::SchemaValidation { .. }));
    }

    #[tokio::test]
    async fn empty_content_makes_zero_gateway_calls() {
        let gateway = StubGateway::with_responses(["unused"]);
        let service = ModerationService::new(&gateway);

        let error = service
            .moderate_content("   ", &ModerationContext::default())
            .await
            .unwrap_err();

        assert!(error.is_invalid_parameters());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn spam_detection_parses_assessment() {
        let gateway = StubGateway::with_responses([
            r#"{
                "is_spam": true,
                "confidence": 0.97,
                "indicators": ["repeated links", "unrelated promotion"],
                "recommended_action": "remove and warn"
            }"#,
        ]);
        let service = ModerationService::new(&gateway);

        let assessment = service
            .detect_spam("BUY NOW cheap watches http://...", None)
            .await
            .unwrap();

        assert!(assessment.is_spam);
        assert_eq!(assessment.indicators.len(), 2);
    }

    #[tokio::test]
    async fn summary_requires_at_least_one_decision() {
        let gateway = StubGateway::with_responses(["unused"]);
        let service = ModerationService::new(&gateway);

        let error = service
            .generate_moderation_summary(&[], "last week")
            .await
            .unwrap_err();

        assert!(error.is_invalid_parameters());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn quality_analysis_returns_report() {
        let gateway = StubGateway::with_responses([
            r#"{
                "score": 0.7,
                "strengths": ["clear structure"],
                "improvements": ["add an example"],
                "engagement_potential": 0.6
            }"#,
        ]);
        let service = ModerationService::new(&gateway);

        let report = service
            .analyze_content_quality("A long post about gardening...", "post")
            .await
            .unwrap();

        assert!((report.score - 0.7).abs() < f64::EPSILON);
        assert_eq!(report.strengths, vec!["clear structure"]);
    }
}
