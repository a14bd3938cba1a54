// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Content generation service
//!
//! One method per content type. Each validates its parameters, renders a
//! prompt, and delegates to the gateway. Structured outputs (posts, event
//! descriptions, guidelines) are schema-validated; prose outputs
//! (discussion starters, rewrites, hashtags) are returned verbatim with no
//! post-processing.

use ai_gateway::{
    FieldKind, FieldSpec, GatewayError, GatewayResult, GenerationOptions, ModelGateway,
    ResponseSchema,
};
use community_types::EventFormat;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::prompts;

/// Writing tone for generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Relaxed, conversational
    Casual,
    /// Polished and formal
    Professional,
    /// Warm and approachable
    Friendly,
    /// High-energy and upbeat
    Enthusiastic,
}

impl Tone {
    /// Parse a tone string as supplied by callers
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "casual" => Some(Self::Casual),
            "professional" => Some(Self::Professional),
            "friendly" => Some(Self::Friendly),
            "enthusiastic" => Some(Self::Enthusiastic),
            _ => None,
        }
    }

    /// Lowercase label used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Enthusiastic => "enthusiastic",
        }
    }
}

/// Participant skill level an event is pitched at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    /// New to the activity
    Beginner,
    /// Some prior experience
    Intermediate,
    /// Experienced participants
    Advanced,
    /// Open to everyone
    AllLevels,
}

impl SkillLevel {
    /// Parse a skill level string as supplied by callers
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "all_levels" | "all levels" => Some(Self::AllLevels),
            _ => None,
        }
    }

    /// Label used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::AllLevels => "all levels",
        }
    }
}

/// A generated community post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Suggested hashtags
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// A generated event description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescription {
    /// Main description text
    pub description: String,
    /// Bullet-point highlights
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Closing call to action
    pub call_to_action: String,
}

/// One guideline entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    /// Short rule title
    pub title: String,
    /// Explanation of the rule
    pub description: String,
}

/// A generated set of community guidelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineSet {
    /// The individual guidelines
    pub guidelines: Vec<Guideline>,
    /// Welcome message shown alongside the rules
    pub welcome_message: String,
}

fn community_post_schema() -> ResponseSchema {
    ResponseSchema::new(
        "community_post",
        vec![
            FieldSpec::required("title", FieldKind::Text, "an engaging post title"),
            FieldSpec::required("content", FieldKind::Text, "the post body"),
            FieldSpec::optional("hashtags", FieldKind::TextArray, "3 to 5 relevant hashtags"),
        ],
    )
}

fn event_description_schema() -> ResponseSchema {
    ResponseSchema::new(
        "event_description",
        vec![
            FieldSpec::required("description", FieldKind::Text, "the event description"),
            FieldSpec::optional(
                "highlights",
                FieldKind::TextArray,
                "3 to 5 bullet-point highlights",
            ),
            FieldSpec::required(
                "call_to_action",
                FieldKind::Text,
                "a closing line encouraging sign-up",
            ),
        ],
    )
}

fn guidelines_schema() -> ResponseSchema {
    ResponseSchema::new(
        "community_guidelines",
        vec![
            FieldSpec::required(
                "guidelines",
                FieldKind::ObjectArray(vec![
                    FieldSpec::required("title", FieldKind::Text, "short rule title"),
                    FieldSpec::required("description", FieldKind::Text, "what the rule means"),
                ]),
                "5 to 8 community rules",
            ),
            FieldSpec::required(
                "welcome_message",
                FieldKind::Text,
                "a warm welcome message for new members",
            ),
        ],
    )
}

fn require_non_empty(name: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::invalid_parameters(format!(
            "{name} cannot be empty"
        )));
    }
    Ok(())
}

fn require_count(name: &str, count: usize) -> GatewayResult<()> {
    if count == 0 || count > 10 {
        return Err(GatewayError::invalid_parameters(format!(
            "{name} must be between 1 and 10, got {count}"
        )));
    }
    Ok(())
}

/// Generates community-facing content through the model gateway
#[derive(Debug)]
pub struct ContentGenerationService<G> {
    gateway: G,
}

impl<G: ModelGateway> ContentGenerationService<G> {
    /// Create a service over the given gateway
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Generate a community post on a topic
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty topic or community type, or
    /// an unknown tone, before any model call; otherwise propagates gateway
    /// failures
    #[instrument(skip(self, keywords, target_audience))]
    pub async fn generate_community_post(
        &self,
        topic: &str,
        community_type: &str,
        tone: &str,
        keywords: &[String],
        target_audience: Option<&str>,
    ) -> GatewayResult<CommunityPost> {
        require_non_empty("topic", topic)?;
        require_non_empty("community_type", community_type)?;
        let tone = Tone::parse(tone).ok_or_else(|| {
            GatewayError::invalid_parameters(format!(
                "tone must be one of casual, professional, friendly, enthusiastic; got '{tone}'"
            ))
        })?;

        let prompt =
            prompts::content::community_post(topic, community_type, tone.as_str(), keywords, target_audience);
        let value = self
            .gateway
            .generate_structured(&prompt, &community_post_schema(), GenerationOptions::default())
            .await?;
        Ok(serde_json::from_value(value).map_err(GatewayError::from)?)
    }

    /// Generate a description for an event
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty title or event type, a
    /// format outside online/offline/hybrid, or an unknown skill level,
    /// before any model call
    #[instrument(skip(self, duration_minutes, skill_level, target_audience))]
    pub async fn generate_event_description(
        &self,
        title: &str,
        event_type: &str,
        format: &str,
        duration_minutes: Option<u32>,
        skill_level: Option<&str>,
        target_audience: Option<&str>,
    ) -> GatewayResult<EventDescription> {
        require_non_empty("title", title)?;
        require_non_empty("event_type", event_type)?;
        let format = EventFormat::parse(format).ok_or_else(|| {
            GatewayError::invalid_parameters(format!(
                "format must be one of online, offline, hybrid; got '{format}'"
            ))
        })?;
        let skill_level = skill_level
            .map(|value| {
                SkillLevel::parse(value).ok_or_else(|| {
                    GatewayError::invalid_parameters(format!(
                        "skill_level must be one of beginner, intermediate, advanced, \
                         all_levels; got '{value}'"
                    ))
                })
            })
            .transpose()?;

        let prompt = prompts::content::event_description(
            title,
            event_type,
            format.as_str(),
            duration_minutes,
            skill_level.map(|level| level.as_str()),
            target_audience,
        );
        let value = self
            .gateway
            .generate_structured(
                &prompt,
                &event_description_schema(),
                GenerationOptions::default(),
            )
            .await?;
        Ok(serde_json::from_value(value).map_err(GatewayError::from)?)
    }

    /// Generate a guideline set for a community type
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty community type
    #[instrument(skip(self, focus_areas))]
    pub async fn generate_community_guidelines(
        &self,
        community_type: &str,
        focus_areas: &[String],
    ) -> GatewayResult<GuidelineSet> {
        require_non_empty("community_type", community_type)?;

        let prompt = prompts::content::community_guidelines(community_type, focus_areas);
        let value = self
            .gateway
            .generate_structured(&prompt, &guidelines_schema(), GenerationOptions::default())
            .await?;
        Ok(serde_json::from_value(value).map_err(GatewayError::from)?)
    }

    /// Generate discussion starter questions, returned as prose
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty topic or a count outside
    /// 1 to 10
    #[instrument(skip(self))]
    pub async fn generate_discussion_starters(
        &self,
        topic: &str,
        community_type: &str,
        count: usize,
    ) -> GatewayResult<String> {
        require_non_empty("topic", topic)?;
        require_non_empty("community_type", community_type)?;
        require_count("count", count)?;

        let prompt = prompts::content::discussion_starters(topic, community_type, count);
        self.gateway
            .generate_text(&prompt, GenerationOptions::default())
            .await
    }

    /// Rewrite content toward a goal, returned verbatim
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for empty content or goal
    #[instrument(skip(self, content))]
    pub async fn improve_content(&self, content: &str, goal: &str) -> GatewayResult<String> {
        require_non_empty("content", content)?;
        require_non_empty("goal", goal)?;

        let prompt = prompts::content::improve_content(content, goal);
        self.gateway
            .generate_text(&prompt, GenerationOptions::default())
            .await
    }

    /// Extract hashtags from content, returned verbatim
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for empty content or a count outside
    /// 1 to 10
    #[instrument(skip(self, content))]
    pub async fn extract_hashtags(&self, content: &str, count: usize) -> GatewayResult<String> {
        require_non_empty("content", content)?;
        require_count("count", count)?;

        let prompt = prompts::content::extract_hashtags(content, count);
        self.gateway
            .generate_text(
                &prompt,
                GenerationOptions::default().with_max_tokens(200),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGateway;

    #[test]
    fn tone_parsing() {
        assert_eq!(Tone::parse("Casual"), Some(Tone::Casual));
        assert_eq!(Tone::parse(" professional "), Some(Tone::Professional));
        assert_eq!(Tone::parse("sarcastic"), None);
    }

    #[test]
    fn skill_level_parsing() {
        assert_eq!(SkillLevel::parse("Beginner"), Some(SkillLevel::Beginner));
        assert_eq!(SkillLevel::parse("all levels"), Some(SkillLevel::AllLevels));
        assert_eq!(SkillLevel::parse("all_levels"), Some(SkillLevel::AllLevels));
        assert_eq!(SkillLevel::parse("grandmaster"), None);
    }

    #[tokio::test]
    async fn community_post_parses_structured_result() {
        let gateway = StubGateway::with_responses([
            r##"{"title": "Weekend Hike", "content": "Join us...", "hashtags": ["#hiking"]}"##,
        ]);
        let service = ContentGenerationService::new(&gateway);

        let post = service
            .generate_community_post("weekend hikes", "outdoors", "friendly", &[], None)
            .await
            .unwrap();

        assert_eq!(post.title, "Weekend Hike");
        assert_eq!(post.hashtags, vec!["#hiking"]);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn community_post_prompt_embeds_parameters() {
        let gateway = StubGateway::with_responses([
            r#"{"title": "t", "content": "c", "hashtags": []}"#,
        ]);
        let service = ContentGenerationService::new(&gateway);

        let keywords = vec!["trail".to_string()];
        service
            .generate_community_post("weekend hikes", "outdoors", "casual", &keywords, Some("beginners"))
            .await
            .unwrap();

        let prompt = &gateway.prompts()[0];
        assert!(prompt.contains("weekend hikes"));
        assert!(prompt.contains("outdoors"));
        assert!(prompt.contains("casual"));
        assert!(prompt.contains("trail"));
        assert!(prompt.contains("beginners"));
    }

    #[tokio::test]
    async fn unknown_tone_is_rejected_before_any_call() {
        let gateway = StubGateway::with_responses(["unused"]);
        let service = ContentGenerationService::new(&gateway);

        let error = service
            .generate_community_post("topic", "type", "sarcastic", &[], None)
            .await
            .unwrap_err();

        assert!(error.is_invalid_parameters());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_event_format_is_rejected_with_zero_gateway_calls() {
        let gateway = StubGateway::with_responses(["unused"]);
        let service = ContentGenerationService::new(&gateway);

        let error = service
            .generate_event_description("Intro Night", "meetup", "telepresence", None, None, None)
            .await
            .unwrap_err();

        assert!(error.is_invalid_parameters());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_skill_level_is_rejected_with_zero_gateway_calls() {
        let gateway = StubGateway::with_responses(["unused"]);
        let service = ContentGenerationService::new(&gateway);

        let error = service
            .generate_event_description(
                "Intro Night",
                "meetup",
                "online",
                None,
                Some("grandmaster"),
                None,
            )
            .await
            .unwrap_err();

        assert!(error.is_invalid_parameters());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn event_description_accepts_declared_formats() {
        let gateway = StubGateway::with_responses([
            r#"{"description": "d", "highlights": ["h"], "call_to_action": "join"}"#,
        ]);
        let service = ContentGenerationService::new(&gateway);

        let description = service
            .generate_event_description(
                "Intro Night",
                "meetup",
                "hybrid",
                Some(90),
                Some("beginner"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(description.call_to_action, "join");
        assert!(gateway.prompts()[0].contains("hybrid"));
        assert!(gateway.prompts()[0].contains("90"));
        assert!(gateway.prompts()[0].contains("beginner"));
    }

    #[tokio::test]
    async fn guidelines_parse_nested_entries() {
        let gateway = StubGateway::with_responses([
            r#"{"guidelines": [{"title": "Be kind", "description": "No personal attacks"}], "welcome_message": "Welcome!"}"#,
        ]);
        let service = ContentGenerationService::new(&gateway);

        let set = service
            .generate_community_guidelines("book club", &[])
            .await
            .unwrap();

        assert_eq!(set.guidelines.len(), 1);
        assert_eq!(set.guidelines[0].title, "Be kind");
        assert_eq!(set.welcome_message, "Welcome!");
    }

    #[tokio::test]
    async fn prose_outputs_are_returned_verbatim() {
        let gateway = StubGateway::with_responses(["1. What got you into climbing?\n2. ..."]);
        let service = ContentGenerationService::new(&gateway);

        let starters = service
            .generate_discussion_starters("climbing", "sports", 2)
            .await
            .unwrap();

        assert_eq!(starters, "1. What got you into climbing?\n2. ...");
    }

    #[tokio::test]
    async fn count_bounds_are_enforced() {
        let gateway = StubGateway::with_responses(["unused"]);
        let service = ContentGenerationService::new(&gateway);

        let error = service
            .generate_discussion_starters("topic", "type", 0)
            .await
            .unwrap_err();
        assert!(error.is_invalid_parameters());

        let error = service.extract_hashtags("some content", 11).await.unwrap_err();
        assert!(error.is_invalid_parameters());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn gateway_failures_propagate_unchanged() {
        let gateway = StubGateway::failing();
        let service = ContentGenerationService::new(&gateway);

        let error = service
            .improve_content("draft text", "make it concise")
            .await
            .unwrap_err();

        assert!(error.is_generation_failure());
        assert_eq!(gateway.call_count(), 1);
    }
}
