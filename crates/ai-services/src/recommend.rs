// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Recommendation engine
//!
//! Candidates are pre-fetched by the caller and passed in; the engine never
//! queries the persistence service. Ranking and justification are delegated
//! entirely to the model. The returned list is capped at
//! `max_recommendations` but may be shorter than requested; callers must
//! handle short lists.

use ai_gateway::{
    FieldKind, FieldSpec, GatewayError, GatewayResult, GenerationOptions, ModelGateway,
    ResponseSchema,
};
use chrono::{DateTime, Utc};
use community_types::{ActivityLevel, Community, ContentItem, Event, Person, UserPreferenceProfile};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::prompts;

/// Candidates beyond this many are dropped before prompting to bound
/// prompt size
pub const CANDIDATE_LIMIT: usize = 30;

/// One entry in a user's activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// What the user did (joined, posted, rsvped, viewed)
    pub action: String,
    /// Name of the thing acted on
    pub target: String,
    /// Category of the target, when known
    pub category: Option<String>,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
}

/// A structured interest profile derived from activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestProfile {
    /// Inferred topics of interest
    pub interests: Vec<String>,
    /// Categories the user gravitates toward
    pub preferred_categories: Vec<String>,
    /// Inferred engagement level
    pub engagement_level: ActivityLevel,
    /// Model's explanation of the inference
    pub reasoning: String,
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Candidate id as supplied in the pool
    pub id: String,
    /// Relevance score, 0.0 to 1.0
    pub score: f64,
    /// Why this candidate fits the profile
    pub reasoning: String,
}

/// Knobs for a recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendOptions {
    /// Upper bound on returned recommendations
    pub max_recommendations: usize,
    /// How much to favor variety over raw relevance, 0.0 to 1.0
    pub diversity_weight: f32,
    /// How much to favor recent candidates, 0.0 to 1.0
    pub recency_weight: f32,
    /// Candidate ids to leave out of the pool
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            max_recommendations: 5,
            diversity_weight: 0.3,
            recency_weight: 0.3,
            exclusions: Vec::new(),
        }
    }
}

impl RecommendOptions {
    fn validate(&self) -> GatewayResult<()> {
        if self.max_recommendations == 0 {
            return Err(GatewayError::invalid_parameters(
                "max_recommendations must be greater than zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.diversity_weight)
            || !(0.0..=1.0).contains(&self.recency_weight)
        {
            return Err(GatewayError::invalid_parameters(
                "diversity_weight and recency_weight must be between 0.0 and 1.0",
            ));
        }
        Ok(())
    }

    fn excludes(&self, id: &str) -> bool {
        self.exclusions.iter().any(|e| e == id)
    }
}

fn interest_schema() -> ResponseSchema {
    ResponseSchema::new(
        "interest_profile",
        vec![
            FieldSpec::required("interests", FieldKind::TextArray, "inferred interest topics"),
            FieldSpec::required(
                "preferred_categories",
                FieldKind::TextArray,
                "categories the user favors",
            ),
            FieldSpec::required(
                "engagement_level",
                FieldKind::Text,
                "low, moderate, or high",
            ),
            FieldSpec::required("reasoning", FieldKind::Text, "how the profile was inferred"),
        ],
    )
}

fn recommendations_schema() -> ResponseSchema {
    ResponseSchema::new(
        "recommendations",
        vec![FieldSpec::required(
            "recommendations",
            FieldKind::ObjectArray(vec![
                FieldSpec::required("id", FieldKind::Text, "candidate id from the list"),
                FieldSpec::required("score", FieldKind::Number, "relevance, 0.0 to 1.0"),
                FieldSpec::required("reasoning", FieldKind::Text, "why it fits the profile"),
            ]),
            "ranked candidates, best first",
        )],
    )
}

#[derive(Debug, Deserialize)]
struct RecommendationList {
    recommendations: Vec<Recommendation>,
}

/// Ranks caller-supplied candidate pools against a preference profile
#[derive(Debug)]
pub struct RecommendationEngine<G> {
    gateway: G,
}

impl<G: ModelGateway> RecommendationEngine<G> {
    /// Create an engine over the given gateway
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Derive a structured interest profile from an activity log
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty activity log
    #[instrument(skip(self, activity))]
    pub async fn analyze_user_interests(
        &self,
        activity: &[ActivityRecord],
    ) -> GatewayResult<InterestProfile> {
        if activity.is_empty() {
            return Err(GatewayError::invalid_parameters(
                "activity log cannot be empty",
            ));
        }

        let prompt = prompts::recommend::interest_analysis(activity);
        let value = self
            .gateway
            .generate_structured(&prompt, &interest_schema(), GenerationOptions::default())
            .await?;

        serde_json::from_value(value).map_err(|e| GatewayError::schema_validation(e.to_string()))
    }

    /// Rank communities against the profile
    ///
    /// Excluded candidates (by id via options, by category via the profile)
    /// are dropped before prompting. An empty surviving pool returns an
    /// empty list without a model call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for out-of-range options
    #[instrument(skip(self, profile, candidates, options))]
    pub async fn recommend_communities(
        &self,
        profile: &UserPreferenceProfile,
        candidates: &[Community],
        options: &RecommendOptions,
    ) -> GatewayResult<Vec<Recommendation>> {
        options.validate()?;
        let pool: Vec<&Community> = candidates
            .iter()
            .filter(|c| !options.excludes(&c.id) && !profile.excludes(&c.category))
            .take(CANDIDATE_LIMIT)
            .collect();
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompts::recommend::community_recommendations(profile, &pool, options);
        self.rank(&prompt, options).await
    }

    /// Rank events against the profile
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for out-of-range options
    #[instrument(skip(self, profile, candidates, options))]
    pub async fn recommend_events(
        &self,
        profile: &UserPreferenceProfile,
        candidates: &[Event],
        options: &RecommendOptions,
    ) -> GatewayResult<Vec<Recommendation>> {
        options.validate()?;
        let pool: Vec<&Event> = candidates
            .iter()
            .filter(|e| !options.excludes(&e.id) && !profile.excludes(&e.category))
            .take(CANDIDATE_LIMIT)
            .collect();
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompts::recommend::event_recommendations(profile, &pool, options);
        self.rank(&prompt, options).await
    }

    /// Rank content items against the profile
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for out-of-range options
    #[instrument(skip(self, profile, candidates, options))]
    pub async fn recommend_content(
        &self,
        profile: &UserPreferenceProfile,
        candidates: &[ContentItem],
        options: &RecommendOptions,
    ) -> GatewayResult<Vec<Recommendation>> {
        options.validate()?;
        let pool: Vec<&ContentItem> = candidates
            .iter()
            .filter(|c| !options.excludes(&c.id) && !profile.excludes(&c.category))
            .take(CANDIDATE_LIMIT)
            .collect();
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompts::recommend::content_recommendations(profile, &pool, options);
        self.rank(&prompt, options).await
    }

    /// Rank people as potential connections against the profile
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for out-of-range options
    #[instrument(skip(self, profile, candidates, options))]
    pub async fn recommend_people(
        &self,
        profile: &UserPreferenceProfile,
        candidates: &[Person],
        options: &RecommendOptions,
    ) -> GatewayResult<Vec<Recommendation>> {
        options.validate()?;
        let pool: Vec<&Person> = candidates
            .iter()
            .filter(|p| !options.excludes(&p.id))
            .take(CANDIDATE_LIMIT)
            .collect();
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompts::recommend::people_recommendations(profile, &pool, options);
        self.rank(&prompt, options).await
    }

    /// Explain a single recommendation on demand
    ///
    /// Kept out of the batch call so batch latency stays bounded.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures
    #[instrument(skip(self, recommendation, profile))]
    pub async fn explain_recommendation(
        &self,
        recommendation: &Recommendation,
        profile: &UserPreferenceProfile,
    ) -> GatewayResult<String> {
        let prompt = prompts::recommend::explain_recommendation(recommendation, profile);
        self.gateway
            .generate_text(&prompt, GenerationOptions::default().with_max_tokens(300))
            .await
    }

    async fn rank(
        &self,
        prompt: &str,
        options: &RecommendOptions,
    ) -> GatewayResult<Vec<Recommendation>> {
        let value = self
            .gateway
            .generate_structured(prompt, &recommendations_schema(), GenerationOptions::default())
            .await?;

        let mut list: RecommendationList = serde_json::from_value(value)
            .map_err(|e| GatewayError::schema_validation(e.to_string()))?;
        list.recommendations.truncate(options.max_recommendations);
        Ok(list.recommendations)
    }
}
