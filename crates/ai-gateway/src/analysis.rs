// SPDX-FileCopyrightText: 2025 Gather Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Content analysis built on structured generation
//!
//! One fixed prompt template per analysis kind, all sharing the
//! `{score, reasoning, confidence}` response shape. Score ranges are
//! described in the prompt but not clamped here; out-of-range scores pass
//! through for the caller's policy to handle.

use serde::{Deserialize, Serialize};

use crate::client::{GenerationOptions, ModelGateway};
use crate::error::GatewayResult;
use crate::schema::{FieldKind, FieldSpec, ResponseSchema};

/// The kind of analysis to run over a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Emotional polarity, score in [-1, 1]
    Sentiment,
    /// Harmfulness, score in [0, 1]
    Toxicity,
    /// Writing quality, score in [0, 1]
    Quality,
}

impl AnalysisKind {
    /// Lowercase label used in logs and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentiment => "sentiment",
            Self::Toxicity => "toxicity",
            Self::Quality => "quality",
        }
    }

    fn score_description(&self) -> &'static str {
        match self {
            Self::Sentiment => {
                "a sentiment score from -1.0 (very negative) to 1.0 (very positive)"
            }
            Self::Toxicity => "a toxicity score from 0.0 (harmless) to 1.0 (severely toxic)",
            Self::Quality => "a quality score from 0.0 (very poor) to 1.0 (excellent)",
        }
    }
}

/// Result of a content analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Score on the kind-specific scale
    pub score: f64,
    /// Model's explanation of the score
    pub reasoning: String,
    /// Model's confidence in its own assessment, 0.0 to 1.0
    pub confidence: f64,
}

/// Schema shared by every analysis kind
pub fn analysis_schema() -> ResponseSchema {
    ResponseSchema::new(
        "content_analysis",
        vec![
            FieldSpec::required("score", FieldKind::Number, "the analysis score"),
            FieldSpec::required(
                "reasoning",
                FieldKind::Text,
                "a short explanation of the score",
            ),
            FieldSpec::required(
                "confidence",
                FieldKind::Number,
                "confidence in the assessment, 0.0 to 1.0",
            ),
        ],
    )
}

/// Prompt template for one analysis kind
pub fn analysis_prompt(content: &str, kind: AnalysisKind) -> String {
    format!(
        "Analyze the {} of the following content. Assign {}.\n\nContent:\n{content}",
        kind.as_str(),
        kind.score_description()
    )
}

/// Analyze content with a fixed prompt per analysis kind
///
/// Uses a low temperature so repeated calls over the same content are as
/// stable as the backend allows.
///
/// # Errors
///
/// Propagates gateway failures after the usual single fallback attempt
pub async fn analyze_content<G: ModelGateway>(
    gateway: &G,
    content: &str,
    kind: AnalysisKind,
) -> GatewayResult<ContentAnalysis> {
    let value = gateway
        .generate_structured(
            &analysis_prompt(content, kind),
            &analysis_schema(),
            GenerationOptions::default()
                .with_temperature(0.1)
                .with_max_tokens(300),
        )
        .await?;

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_mentions_kind_and_scale() {
        let prompt = analysis_prompt("great meetup!", AnalysisKind::Sentiment);
        assert!(prompt.contains("sentiment"));
        assert!(prompt.contains("-1.0"));
        assert!(prompt.contains("great meetup!"));

        let prompt = analysis_prompt("spam spam", AnalysisKind::Toxicity);
        assert!(prompt.contains("toxicity"));
        assert!(prompt.contains("0.0 (harmless)"));
    }

    #[test]
    fn schema_accepts_canonical_shape() {
        let schema = analysis_schema();
        assert!(
            schema
                .validate(&json!({"score": 0.4, "reasoning": "neutral", "confidence": 0.9}))
                .is_ok()
        );
        assert!(schema.validate(&json!({"score": 0.4})).is_err());
    }

    #[test]
    fn out_of_range_scores_pass_through() {
        // Range enforcement is deliberately left to callers.
        let schema = analysis_schema();
        let value = json!({"score": 5.0, "reasoning": "x", "confidence": 0.5});
        assert!(schema.validate(&value).is_ok());
        let parsed: ContentAnalysis = serde_json::from_value(value).unwrap();
        assert!((parsed.score - 5.0).abs() < f64::EPSILON);
    }
}
