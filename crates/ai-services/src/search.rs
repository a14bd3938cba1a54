// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Smart search service
//!
//! Single-shot prompt/response pairs for query-intent extraction and
//! model-based relevance ranking. `semantic_search` inlines the caller's
//! documents into the prompt, so the candidate set is truncated before
//! prompting; this is not a vector-index lookup.

use ai_gateway::{
    FieldKind, FieldSpec, GatewayError, GatewayResult, GenerationOptions, ModelGateway,
    ResponseSchema,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::prompts;

/// Documents beyond this many are dropped before prompting
pub const DOCUMENT_LIMIT: usize = 20;

/// What the user is trying to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntentKind {
    /// Looking for communities to join
    FindCommunities,
    /// Looking for events to attend
    FindEvents,
    /// Looking for people to connect with
    FindPeople,
    /// Looking for posts or discussions
    FindContent,
    /// Asking a question rather than searching
    GeneralQuestion,
}

/// A typed, scored entity extracted from a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntity {
    /// Entity text as it appeared
    pub name: String,
    /// Entity kind (topic, location, date, price)
    pub entity_type: String,
    /// Relevance to the query, 0.0 to 1.0
    pub relevance: f64,
}

/// Optional filters inferred from a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Category constraint
    #[serde(default)]
    pub category: Option<String>,
    /// Location constraint
    #[serde(default)]
    pub location: Option<String>,
    /// Time-range phrase ("this week")
    #[serde(default)]
    pub time_range: Option<String>,
    /// Price constraint ("free", "budget")
    #[serde(default)]
    pub price_range: Option<String>,
    /// Skill-level constraint
    #[serde(default)]
    pub skill_level: Option<String>,
}

/// A structured interpretation of a search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIntent {
    /// What the user is trying to find
    pub intent: SearchIntentKind,
    /// Entities extracted from the query
    #[serde(default)]
    pub entities: Vec<SearchEntity>,
    /// Inferred filters
    #[serde(default)]
    pub filters: SearchFilters,
    /// Alternative queries worth offering
    #[serde(default)]
    pub suggested_queries: Vec<String>,
}

/// A document supplied to semantic search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Stable identifier
    pub id: String,
    /// Title or first line
    pub title: String,
    /// Body text
    pub body: String,
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document id from the supplied list
    pub id: String,
    /// Relevance to the query, 0.0 to 1.0
    pub relevance: f64,
    /// Why the document matches
    pub reasoning: String,
}

fn intent_schema() -> ResponseSchema {
    ResponseSchema::new(
        "search_intent",
        vec![
            FieldSpec::required(
                "intent",
                FieldKind::Text,
                "one of: find_communities, find_events, find_people, find_content, \
                 general_question",
            ),
            FieldSpec::required(
                "entities",
                FieldKind::ObjectArray(vec![
                    FieldSpec::required("name", FieldKind::Text, "entity text"),
                    FieldSpec::required("entity_type", FieldKind::Text, "topic, location, date, or price"),
                    FieldSpec::required("relevance", FieldKind::Number, "0.0 to 1.0"),
                ]),
                "entities found in the query",
            ),
            FieldSpec::optional(
                "filters",
                FieldKind::Object,
                "optional category, location, time_range, price_range, skill_level",
            ),
            FieldSpec::required(
                "suggested_queries",
                FieldKind::TextArray,
                "up to 3 alternative queries",
            ),
        ],
    )
}

fn suggestions_schema() -> ResponseSchema {
    ResponseSchema::new(
        "search_suggestions",
        vec![FieldSpec::required(
            "suggestions",
            FieldKind::TextArray,
            "query completions, most likely first",
        )],
    )
}

fn results_schema() -> ResponseSchema {
    ResponseSchema::new(
        "search_results",
        vec![FieldSpec::required(
            "results",
            FieldKind::ObjectArray(vec![
                FieldSpec::required("id", FieldKind::Text, "document id from the list"),
                FieldSpec::required("relevance", FieldKind::Number, "0.0 to 1.0"),
                FieldSpec::required("reasoning", FieldKind::Text, "why it matches"),
            ]),
            "relevant documents only, best first",
        )],
    )
}

#[derive(Debug, Deserialize)]
struct ResultList {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SuggestionList {
    suggestions: Vec<String>,
}

fn require_non_empty(name: &str, value: &str) -> GatewayResult<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::invalid_parameters(format!(
            "{name} cannot be empty"
        )));
    }
    Ok(())
}

/// Query understanding and model-based relevance ranking
#[derive(Debug)]
pub struct SmartSearchService<G> {
    gateway: G,
}

impl<G: ModelGateway> SmartSearchService<G> {
    /// Create a service over the given gateway
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Extract structured intent from a search query
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty query
    #[instrument(skip(self, user_context))]
    pub async fn analyze_search_intent(
        &self,
        query: &str,
        user_context: Option<&str>,
    ) -> GatewayResult<SearchIntent> {
        require_non_empty("query", query)?;

        let prompt = prompts::search::search_intent(query, user_context);
        let value = self
            .gateway
            .generate_structured(
                &prompt,
                &intent_schema(),
                GenerationOptions::default().with_temperature(0.2),
            )
            .await?;

        serde_json::from_value(value).map_err(|e| GatewayError::schema_validation(e.to_string()))
    }

    /// Rewrite a query for better recall, returned verbatim
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty query
    #[instrument(skip(self))]
    pub async fn enhance_search_query(&self, query: &str) -> GatewayResult<String> {
        require_non_empty("query", query)?;

        let prompt = prompts::search::enhance_query(query);
        self.gateway
            .generate_text(&prompt, GenerationOptions::default().with_max_tokens(100))
            .await
    }

    /// Suggest completions for a partial query
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty partial query
    #[instrument(skip(self, context))]
    pub async fn generate_search_suggestions(
        &self,
        partial_query: &str,
        context: Option<&str>,
    ) -> GatewayResult<Vec<String>> {
        require_non_empty("partial_query", partial_query)?;

        let prompt = prompts::search::search_suggestions(partial_query, context);
        let value = self
            .gateway
            .generate_structured(&prompt, &suggestions_schema(), GenerationOptions::default())
            .await?;

        let list: SuggestionList = serde_json::from_value(value)
            .map_err(|e| GatewayError::schema_validation(e.to_string()))?;
        Ok(list.suggestions)
    }

    /// Rank caller-supplied documents by relevance to a query
    ///
    /// Documents are truncated to [`DOCUMENT_LIMIT`] before prompting. An
    /// empty document list returns an empty result without a model call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty query
    #[instrument(skip(self, documents))]
    pub async fn semantic_search(
        &self,
        query: &str,
        documents: &[SearchDocument],
    ) -> GatewayResult<Vec<SearchResult>> {
        require_non_empty("query", query)?;
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let pool = &documents[..documents.len().min(DOCUMENT_LIMIT)];
        let prompt = prompts::search::semantic_search(query, pool);
        let value = self
            .gateway
            .generate_structured(&prompt, &results_schema(), GenerationOptions::default())
            .await?;

        let list: ResultList = serde_json::from_value(value)
            .map_err(|e| GatewayError::schema_validation(e.to_string()))?;
        Ok(list.results)
    }

    /// Explain a result set to the user as prose
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` for an empty query
    #[instrument(skip(self, results))]
    pub async fn explain_search_results(
        &self,
        query: &str,
        results: &[SearchResult],
    ) -> GatewayResult<String> {
        require_non_empty("query", query)?;

        let prompt = prompts::search::explain_results(query, results);
        self.gateway
            .generate_text(&prompt, GenerationOptions::default().with_max_tokens(300))
            .await
    }
}
