// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Conversational assistant
//!
//! A [`ConversationSession`] owns an append-only turn log. Prompts include
//! only the most recent N turns to bound prompt size; older turns stay in
//! the log. Unlike every other service, the assistant never surfaces a
//! gateway failure to its caller: a failed model call yields a canned
//! apology with `ActionType::ContinueConversation` so the chat UI never
//! shows a raw error.
//!
//! Sessions are not synchronized; a session belongs to one logical
//! conversation. Concurrent calls on a shared session append in whatever
//! order the scheduler yields.

use ai_gateway::{
    FieldKind, FieldSpec, GenerationOptions, ModelGateway, ResponseSchema,
};
use chrono::{DateTime, Utc};
use community_types::{ContentItem, ConversationTurn, Event, UserPreferenceProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::calendar;
use crate::prompts;
use crate::recommend::Recommendation;

/// Default number of recent turns included in prompt context
pub const DEFAULT_CONTEXT_WINDOW: usize = 6;

/// Largest configurable context window
pub const MAX_CONTEXT_WINDOW: usize = 8;

/// Which surface the conversation started from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationContext {
    /// The user's dashboard
    Dashboard,
    /// The events page
    Events,
    /// The community discovery page
    Discover,
    /// Anywhere else
    #[default]
    Default,
}

impl ConversationContext {
    /// Lowercase label used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Events => "events",
            Self::Discover => "discover",
            Self::Default => "default",
        }
    }
}

/// Follow-up action the UI should perform after a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Keep chatting, nothing else to do
    #[default]
    ContinueConversation,
    /// Show recommendations to the user
    ShowRecommendations,
    /// Run a content search
    SearchContent,
    /// The reply itself carries the requested information
    ProvideInfo,
    /// Hand off to human support
    EscalateSupport,
    /// Open the calendar view
    ShowCalendar,
    /// Open the user's profile
    ShowProfile,
    /// Navigate to a specific page
    NavigateTo,
}

/// The welcome returned when a conversation starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Welcome {
    /// Welcome message text
    pub message: String,
    /// Suggested things to ask
    pub suggestions: Vec<String>,
    /// Quick actions for the context
    pub quick_actions: Vec<String>,
}

/// A structured assistant reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Reply text shown to the user
    pub response: String,
    /// Optional follow-up questions to offer
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    /// What the UI should do next
    pub action_type: ActionType,
    /// Preference fields the model believes it detected
    pub extracted_preferences: Option<Value>,
    /// Target page when `action_type` is `NavigateTo`
    pub navigation_target: Option<String>,
    /// Calendar query when `action_type` is `ShowCalendar`
    pub calendar_query: Option<String>,
    /// Search filters when `action_type` is `SearchContent`
    pub search_filters: Option<Value>,
}

impl AssistantReply {
    fn apology() -> Self {
        Self {
            response: "I'm sorry, I'm having trouble responding right now. \
                       Please try again in a moment."
                .to_string(),
            follow_up_questions: Vec::new(),
            action_type: ActionType::ContinueConversation,
            extracted_preferences: None,
            navigation_target: None,
            calendar_query: None,
            search_filters: None,
        }
    }
}

/// Outcome of interpreting user feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    /// The updated preference profile; persisting it is the caller's job
    pub preferences: UserPreferenceProfile,
    /// Whether the caller should re-run the recommendation engine
    pub new_recommendations: bool,
}

/// Raw reply shape before the action type is interpreted
#[derive(Debug, Deserialize)]
struct RawReply {
    response: String,
    #[serde(default)]
    follow_up_questions: Vec<String>,
    action_type: String,
    #[serde(default)]
    extracted_preferences: Option<Value>,
    #[serde(default)]
    navigation_target: Option<String>,
    #[serde(default)]
    calendar_query: Option<String>,
    #[serde(default)]
    search_filters: Option<Value>,
}

fn parse_action_type(raw: &str) -> ActionType {
    serde_json::from_value(Value::String(raw.to_string())).unwrap_or_default()
}

fn reply_schema() -> ResponseSchema {
    ResponseSchema::new(
        "assistant_reply",
        vec![
            FieldSpec::required("response", FieldKind::Text, "the reply shown to the user"),
            FieldSpec::optional(
                "follow_up_questions",
                FieldKind::TextArray,
                "up to 3 follow-up questions",
            ),
            FieldSpec::required(
                "action_type",
                FieldKind::Text,
                "one of: continue_conversation, show_recommendations, search_content, \
                 provide_info, escalate_support, show_calendar, show_profile, navigate_to",
            ),
            FieldSpec::optional(
                "extracted_preferences",
                FieldKind::Object,
                "preference fields detected in the message",
            ),
            FieldSpec::optional(
                "navigation_target",
                FieldKind::Text,
                "page to navigate to, for navigate_to",
            ),
            FieldSpec::optional(
                "calendar_query",
                FieldKind::Text,
                "time reference, for show_calendar",
            ),
            FieldSpec::optional(
                "search_filters",
                FieldKind::Object,
                "filters to apply, for search_content",
            ),
        ],
    )
}

fn feedback_schema() -> ResponseSchema {
    ResponseSchema::new(
        "feedback_outcome",
        vec![
            FieldSpec::required(
                "preferences",
                FieldKind::Object,
                "the full updated preference profile",
            ),
            FieldSpec::required(
                "new_recommendations",
                FieldKind::Boolean,
                "whether recommendations should be regenerated",
            ),
        ],
    )
}

fn welcome_for(context: ConversationContext) -> Welcome {
    match context {
        ConversationContext::Dashboard => Welcome {
            message: "Welcome back! I can help you catch up on your communities \
                      or find something new to join."
                .to_string(),
            suggestions: vec![
                "What's new in my communities?".to_string(),
                "Any events coming up this week?".to_string(),
                "Recommend a new community for me".to_string(),
            ],
            quick_actions: vec!["show_calendar".to_string(), "show_recommendations".to_string()],
        },
        ConversationContext::Events => Welcome {
            message: "Looking for something to attend? Tell me what you're in \
                      the mood for and I'll find matching events."
                .to_string(),
            suggestions: vec![
                "What's happening tomorrow?".to_string(),
                "Find free online events".to_string(),
                "Any beginner-friendly workshops?".to_string(),
            ],
            quick_actions: vec!["show_calendar".to_string()],
        },
        ConversationContext::Discover => Welcome {
            message: "Let's find your next community. What are you interested in?".to_string(),
            suggestions: vec![
                "Show me small, active communities".to_string(),
                "I'm into photography".to_string(),
                "What's popular near me?".to_string(),
            ],
            quick_actions: vec!["show_recommendations".to_string()],
        },
        ConversationContext::Default => Welcome {
            message: "Hi! I'm your community assistant. Ask me about communities, \
                      events, or anything on the platform."
                .to_string(),
            suggestions: vec![
                "Help me find a community".to_string(),
                "What can you do?".to_string(),
            ],
            quick_actions: Vec::new(),
        },
    }
}

/// One conversational session with its own turn log
#[derive(Debug)]
pub struct ConversationSession<G> {
    gateway: G,
    turns: Vec<ConversationTurn>,
    context_window: usize,
}

impl<G: ModelGateway> ConversationSession<G> {
    /// Create a session with the default context window
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            turns: Vec::new(),
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    /// Set how many recent turns are included in prompt context
    ///
    /// Clamped to 1 through [`MAX_CONTEXT_WINDOW`].
    #[must_use]
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window.clamp(1, MAX_CONTEXT_WINDOW);
        self
    }

    /// The full turn log, oldest first
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Reset the session to its uninitialized state
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Start a conversation for a surface, seeding the transcript with the
    /// welcome turn
    pub fn start_conversation(&mut self, context: ConversationContext) -> Welcome {
        self.turns.clear();
        let welcome = welcome_for(context);
        self.turns
            .push(ConversationTurn::assistant(welcome.message.clone()));
        welcome
    }

    /// Process a user message and return the assistant's structured reply
    ///
    /// Never returns an error: a gateway failure or unparseable reply
    /// yields a canned apology with `continue_conversation`. The caller is
    /// responsible for acting on `action_type`.
    #[instrument(skip_all, fields(turn_count = self.turns.len()))]
    pub async fn process_user_message(
        &mut self,
        message: &str,
        preferences: Option<&UserPreferenceProfile>,
        context: Option<ConversationContext>,
    ) -> AssistantReply {
        if message.trim().is_empty() {
            return AssistantReply {
                response: "I didn't catch that. What would you like to know?".to_string(),
                ..AssistantReply::apology()
            };
        }

        // Context covers the most recent turns before this message; the
        // message itself is rendered separately in the prompt.
        let window_start = self.turns.len().saturating_sub(self.context_window);
        let recent = &self.turns[window_start..];
        let prompt = prompts::assistant::conversation(
            recent,
            preferences,
            context.unwrap_or_default(),
            message,
        );

        self.turns.push(ConversationTurn::user(message));

        let reply = match self
            .gateway
            .generate_structured(&prompt, &reply_schema(), GenerationOptions::default())
            .await
        {
            Ok(value) => match serde_json::from_value::<RawReply>(value) {
                Ok(raw) => AssistantReply {
                    response: raw.response,
                    follow_up_questions: raw.follow_up_questions,
                    action_type: parse_action_type(&raw.action_type),
                    extracted_preferences: raw.extracted_preferences,
                    navigation_target: raw.navigation_target,
                    calendar_query: raw.calendar_query,
                    search_filters: raw.search_filters,
                },
                Err(error) => {
                    warn!(error = %error, "Assistant reply did not parse, recovering locally");
                    AssistantReply::apology()
                }
            },
            Err(error) => {
                warn!(error = %error, "Gateway failed, recovering with canned reply");
                AssistantReply::apology()
            }
        };

        self.turns
            .push(ConversationTurn::assistant(reply.response.clone()));
        reply
    }

    /// Interpret free-text feedback against the current preferences
    ///
    /// Recovers locally like `process_user_message`: on failure the current
    /// preferences are returned unchanged with `new_recommendations` false.
    #[instrument(skip_all)]
    pub async fn process_feedback(
        &self,
        feedback: &str,
        current_preferences: &UserPreferenceProfile,
        last_recommendations: &[Recommendation],
    ) -> FeedbackOutcome {
        let unchanged = FeedbackOutcome {
            preferences: current_preferences.clone(),
            new_recommendations: false,
        };
        if feedback.trim().is_empty() {
            return unchanged;
        }

        let prompt =
            prompts::assistant::feedback(feedback, current_preferences, last_recommendations);
        let value = match self
            .gateway
            .generate_structured(&prompt, &feedback_schema(), GenerationOptions::default())
            .await
        {
            Ok(value) => value,
            Err(error) => {
                warn!(error = %error, "Feedback interpretation failed, keeping preferences");
                return unchanged;
            }
        };

        let preferences: UserPreferenceProfile =
            match serde_json::from_value(value["preferences"].clone()) {
                Ok(preferences) => preferences,
                Err(error) => {
                    warn!(error = %error, "Updated preferences did not parse, keeping current");
                    return unchanged;
                }
            };

        FeedbackOutcome {
            preferences,
            new_recommendations: value["new_recommendations"].as_bool().unwrap_or(false),
        }
    }

    /// Filter a caller-supplied event list by a natural-language calendar
    /// query, using date arithmetic only
    pub fn calendar_events(
        &self,
        query: &str,
        events: &[Event],
        now: DateTime<Utc>,
    ) -> Vec<Event> {
        calendar::filter_events(query, events, now)
    }

    /// Filter caller-supplied content by case-insensitive keyword match
    pub fn search_content(&self, query: &str, items: &[ContentItem]) -> Vec<ContentItem> {
        let needle = query.to_lowercase();
        items
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&needle)
                    || item.body.to_lowercase().contains(&needle)
                    || item.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use community_types::{EventFormat, TurnRole};

    use super::*;
    use crate::test_support::StubGateway;

    fn reply_json(response: &str) -> String {
        format!(
            r#"{{"response": "{response}", "action_type": "continue_conversation"}}"#
        )
    }

    #[test]
    fn start_conversation_seeds_one_assistant_turn() {
        let gateway = StubGateway::with_responses(Vec::<String>::new());
        let mut session = ConversationSession::new(&gateway);

        let welcome = session.start_conversation(ConversationContext::Events);

        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, TurnRole::Assistant);
        assert_eq!(session.turns()[0].content, welcome.message);
        assert!(!welcome.suggestions.is_empty());
    }

    #[test]
    fn each_context_has_a_distinct_welcome() {
        let messages: Vec<String> = [
            ConversationContext::Dashboard,
            ConversationContext::Events,
            ConversationContext::Discover,
            ConversationContext::Default,
        ]
        .iter()
        .map(|context| welcome_for(*context).message)
        .collect();

        for (i, message) in messages.iter().enumerate() {
            for other in &messages[i + 1..] {
                assert_ne!(message, other);
            }
        }
    }

    #[tokio::test]
    async fn reply_appends_user_and_assistant_turns() {
        let gateway = StubGateway::with_responses([reply_json("Happy to help!")]);
        let mut session = ConversationSession::new(&gateway);

        let reply = session.process_user_message("hi there", None, None).await;

        assert_eq!(reply.response, "Happy to help!");
        assert_eq!(reply.action_type, ActionType::ContinueConversation);
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0].role, TurnRole::User);
        assert_eq!(session.turns()[1].role, TurnRole::Assistant);
    }

    #[tokio::test]
    async fn context_window_bounds_the_prompt() {
        // Accumulate 12 turns, then check the 13th call's prompt includes
        // only the most recent six.
        let responses: Vec<String> = (1..=7).map(|i| reply_json(&format!("reply-{i}"))).collect();
        let gateway = StubGateway::with_responses(responses);
        let mut session = ConversationSession::new(&gateway);

        for i in 1..=6 {
            session
                .process_user_message(&format!("message-{i}"), None, None)
                .await;
        }
        assert_eq!(session.turns().len(), 12);

        session.process_user_message("message-7", None, None).await;

        let prompts = gateway.prompts();
        let final_prompt = prompts.last().unwrap();
        // Turns 1-6 (message-1 through reply-3) fall outside the window.
        assert!(!final_prompt.contains("message-1\n"));
        assert!(!final_prompt.contains("message-2"));
        assert!(!final_prompt.contains("reply-3"));
        // Turns 7-12 are inside it.
        assert!(final_prompt.contains("message-4"));
        assert!(final_prompt.contains("reply-4"));
        assert!(final_prompt.contains("message-6"));
        assert!(final_prompt.contains("reply-6"));
        // The new message is rendered separately.
        assert!(final_prompt.contains("message-7"));
    }

    #[tokio::test]
    async fn configured_window_of_eight_keeps_more_turns() {
        let responses: Vec<String> = (1..=7).map(|i| reply_json(&format!("reply-{i}"))).collect();
        let gateway = StubGateway::with_responses(responses);
        let mut session = ConversationSession::new(&gateway).with_context_window(8);

        for i in 1..=6 {
            session
                .process_user_message(&format!("message-{i}"), None, None)
                .await;
        }
        session.process_user_message("message-7", None, None).await;

        let prompts = gateway.prompts();
        let final_prompt = prompts.last().unwrap();
        assert!(final_prompt.contains("message-3"));
        assert!(!final_prompt.contains("message-2"));
    }

    #[tokio::test]
    async fn gateway_failure_yields_apology_not_error() {
        let gateway = StubGateway::failing();
        let mut session = ConversationSession::new(&gateway);

        let reply = session
            .process_user_message("are you there?", None, None)
            .await;

        assert_eq!(reply.action_type, ActionType::ContinueConversation);
        assert!(!reply.response.is_empty());
        assert!(reply.response.contains("sorry"));
        // The apology is still logged as an assistant turn.
        assert_eq!(session.turns().len(), 2);
    }

    #[tokio::test]
    async fn unknown_action_type_degrades_to_continue() {
        let gateway = StubGateway::with_responses([
            r#"{"response": "ok", "action_type": "launch_rocket"}"#,
        ]);
        let mut session = ConversationSession::new(&gateway);

        let reply = session.process_user_message("do it", None, None).await;
        assert_eq!(reply.action_type, ActionType::ContinueConversation);
    }

    #[tokio::test]
    async fn action_types_parse_from_snake_case() {
        let gateway = StubGateway::with_responses([
            r#"{"response": "here you go", "action_type": "show_calendar", "calendar_query": "this week"}"#,
        ]);
        let mut session = ConversationSession::new(&gateway);

        let reply = session
            .process_user_message("what's on this week?", None, None)
            .await;

        assert_eq!(reply.action_type, ActionType::ShowCalendar);
        assert_eq!(reply.calendar_query.as_deref(), Some("this week"));
    }

    #[tokio::test]
    async fn preferences_are_embedded_in_the_prompt() {
        let gateway = StubGateway::with_responses([reply_json("noted")]);
        let mut session = ConversationSession::new(&gateway);

        let profile = UserPreferenceProfile {
            interests: vec!["chess".to_string()],
            ..UserPreferenceProfile::default()
        };
        session
            .process_user_message("find me a club", Some(&profile), None)
            .await;

        assert!(gateway.prompts()[0].contains("chess"));
    }

    #[tokio::test]
    async fn feedback_updates_preferences() {
        let gateway = StubGateway::with_responses([
            r#"{
                "preferences": {
                    "interests": ["board games"],
                    "community_size": "small",
                    "format": "offline",
                    "activity_level": "moderate",
                    "goals": [],
                    "location": null,
                    "experience": "beginner",
                    "time_commitment": "regular",
                    "price_range": "any",
                    "excluded_categories": ["crypto"]
                },
                "new_recommendations": true
            }"#,
        ]);
        let session = ConversationSession::new(&gateway);

        let outcome = session
            .process_feedback(
                "too big, and no crypto stuff please",
                &UserPreferenceProfile::default(),
                &[],
            )
            .await;

        assert!(outcome.new_recommendations);
        assert_eq!(outcome.preferences.excluded_categories, vec!["crypto"]);
    }

    #[tokio::test]
    async fn feedback_failure_keeps_current_preferences() {
        let gateway = StubGateway::failing();
        let session = ConversationSession::new(&gateway);

        let current = UserPreferenceProfile {
            interests: vec!["hiking".to_string()],
            ..UserPreferenceProfile::default()
        };
        let outcome = session.process_feedback("meh", &current, &[]).await;

        assert!(!outcome.new_recommendations);
        assert_eq!(outcome.preferences, current);
    }

    #[test]
    fn clear_resets_the_session() {
        let gateway = StubGateway::with_responses(Vec::<String>::new());
        let mut session = ConversationSession::new(&gateway);
        session.start_conversation(ConversationContext::Default);
        assert_eq!(session.turns().len(), 1);

        session.clear();
        assert!(session.turns().is_empty());
    }

    #[test]
    fn calendar_queries_stay_deterministic() {
        let gateway = StubGateway::with_responses(Vec::<String>::new());
        let session = ConversationSession::new(&gateway);

        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let events = vec![
            Event {
                id: "tomorrow".to_string(),
                title: "Tomorrow Meetup".to_string(),
                description: String::new(),
                category: "social".to_string(),
                format: EventFormat::Online,
                starts_at: Utc.with_ymd_and_hms(2024, 1, 16, 18, 0, 0).unwrap(),
                location: None,
                price: None,
            },
            Event {
                id: "next-week".to_string(),
                title: "Next Week Workshop".to_string(),
                description: String::new(),
                category: "learning".to_string(),
                format: EventFormat::Offline,
                starts_at: Utc.with_ymd_and_hms(2024, 1, 22, 18, 0, 0).unwrap(),
                location: None,
                price: None,
            },
        ];

        let matched = session.calendar_events("tomorrow", &events, now);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "tomorrow");
        assert_eq!(gateway.call_count(), 0);
    }

    #[test]
    fn content_search_matches_title_body_and_category() {
        let gateway = StubGateway::with_responses(Vec::<String>::new());
        let session = ConversationSession::new(&gateway);

        let items = vec![
            ContentItem {
                id: "1".to_string(),
                title: "Sourdough basics".to_string(),
                body: "Starter care and feeding".to_string(),
                category: "baking".to_string(),
                created_at: Utc::now(),
            },
            ContentItem {
                id: "2".to_string(),
                title: "Trail running tips".to_string(),
                body: "Pacing on hills".to_string(),
                category: "sports".to_string(),
                created_at: Utc::now(),
            },
        ];

        let matched = session.search_content("BAKING", &items);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "1");
        assert_eq!(gateway.call_count(), 0);
    }
}
