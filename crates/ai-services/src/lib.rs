// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Domain AI services for the Gather community platform
//!
//! Each service renders a prompt, delegates to the model gateway, and hands
//! the validated result back to the caller unchanged. The services are
//! stateless with one exception: [`ConversationSession`] owns an append-only
//! turn log bounded to the most recent N turns when building prompt context.
//!
//! Services are constructed explicitly with the gateway they should use.
//! There are no ambient singletons; tests substitute scripted gateways
//! per-instance.
//!
//! # Services
//!
//! - [`ContentGenerationService`]: posts, event descriptions, guidelines,
//!   discussion starters, rewrites, hashtags
//! - [`ModerationService`]: moderation decisions, quality analysis, spam
//!   detection, summaries
//! - [`RecommendationEngine`]: model-ranked community/event/content/person
//!   recommendations over caller-supplied candidate pools
//! - [`ConversationSession`]: the conversational assistant
//! - [`SmartSearchService`]: intent extraction and semantic ranking
//! - [`calendar`]: deterministic natural-language date-window filtering

pub mod assistant;
pub mod calendar;
pub mod content;
pub mod moderation;
pub mod prompts;
pub mod recommend;
pub mod search;

pub use assistant::{
    ActionType, AssistantReply, ConversationContext, ConversationSession, DEFAULT_CONTEXT_WINDOW,
    FeedbackOutcome, MAX_CONTEXT_WINDOW, Welcome,
};
pub use calendar::{DateWindow, filter_events, parse_time_phrase};
pub use content::{
    CommunityPost, ContentGenerationService, EventDescription, Guideline, GuidelineSet,
    SkillLevel, Tone,
};
pub use moderation::{
    MODERATION_CATEGORIES, ModerationContext, ModerationDecision, ModerationService,
    ModerationVerdict, QualityReport, Severity, SpamAssessment, SuggestedGuidelines, UserHistory,
};
pub use recommend::{
    ActivityRecord, CANDIDATE_LIMIT, InterestProfile, Recommendation, RecommendationEngine,
    RecommendOptions,
};
pub use search::{
    DOCUMENT_LIMIT, SearchDocument, SearchEntity, SearchFilters, SearchIntent, SearchIntentKind,
    SearchResult, SmartSearchService,
};
