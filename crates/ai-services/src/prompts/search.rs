// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Smart search templates

use crate::search::{SearchDocument, SearchResult};

/// Prompt for query-intent extraction
pub fn search_intent(query: &str, user_context: Option<&str>) -> String {
    let mut prompt = format!(
        "Interpret this search query from a community platform user. \
         Identify what they are trying to find, the entities mentioned, and \
         any implied filters.\n\nQuery: {query}"
    );
    if let Some(context) = user_context {
        prompt.push_str(&format!("\nUser context: {context}"));
    }
    prompt
}

/// Prompt for query enhancement
pub fn enhance_query(query: &str) -> String {
    format!(
        "Rewrite this search query to improve recall on a community \
         platform. Add close synonyms and related terms, keep it under \
         twelve words, and return only the rewritten query.\n\nQuery: {query}"
    )
}

/// Prompt for search suggestions
pub fn search_suggestions(partial_query: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "Suggest up to 5 likely search completions for a community platform \
         user who has typed: \"{partial_query}\""
    );
    if let Some(context) = context {
        prompt.push_str(&format!("\nContext: {context}"));
    }
    prompt
}

/// Prompt for model-based relevance ranking
pub fn semantic_search(query: &str, documents: &[SearchDocument]) -> String {
    let lines: Vec<String> = documents
        .iter()
        .map(|doc| format!("- id: {} | {} | {}", doc.id, doc.title, doc.body))
        .collect();

    format!(
        "Rank these documents by relevance to the query \"{query}\". Return \
         only documents that are actually relevant, best first, citing \
         document ids.\n\nDocuments:\n{}",
        lines.join("\n")
    )
}

/// Prompt for explaining a result set
pub fn explain_results(query: &str, results: &[SearchResult]) -> String {
    let lines: Vec<String> = results
        .iter()
        .map(|r| format!("- {} (relevance {:.2}): {}", r.id, r.relevance, r.reasoning))
        .collect();

    format!(
        "A user searched for \"{query}\" and got these results:\n{}\n\n\
         Explain in a friendly sentence or two why these results match \
         their search.",
        lines.join("\n")
    )
}
