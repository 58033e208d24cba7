//! Citation Validator (Tier 3)
//!
//! Checks one citation against ground truth: the literal turn text and the
//! insight's own tags/text. Three independent checks, each appending a
//! human-readable issue on failure - no single check is fatal to the others:
//!
//! 1. **Quote fidelity**: a non-empty `specific_element` must occur in the
//!    turn text, exactly or by fuzzy window match (accept at similarity >= 0.8)
//! 2. **Relevance floor**: `relevance_score` under 0.3 is flagged
//! 3. **Semantic alignment**: no tag overlap with the insight is a warning -
//!    absence of overlap is weak evidence of irrelevance, not proof
//!
//! `is_valid` is true iff no issues were raised. Issue strings come from a
//! fixed template vocabulary so the session report can bucket them.

use crate::types::{CitationCheckInput, Validation, ValidationError, ValidationResult, ValidationStatus};
use crate::validators::quote_matcher;
use async_trait::async_trait;
use qice_common::params::ScoringParams;
use serde_json::json;
use tracing::debug;

/// Citation Validator
pub struct CitationValidator {
    params: ScoringParams,
}

impl CitationValidator {
    /// Create a validator with the given scoring parameters
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Run the three checks for one citation
    fn check_citation(&self, input: &CitationCheckInput) -> ValidationResult {
        let citation = &input.citation;
        let mut issues = Vec::new();

        // Check 1: Quote fidelity (exact, then fuzzy window)
        let similarity = if citation.specific_element.is_empty() {
            None
        } else {
            let similarity =
                quote_matcher::best_window_similarity(&citation.specific_element, &input.turn_text);
            if similarity < self.params.fuzzy_accept_threshold {
                issues.push(format!(
                    "quote not found in turn {} (best similarity {:.2})",
                    citation.turn_id, similarity
                ));
            }
            Some(similarity)
        };

        // Check 2: Relevance floor
        if citation.relevance_score < self.params.relevance_floor {
            issues.push(format!(
                "low relevance score {:.2} for turn {}",
                citation.relevance_score, citation.turn_id
            ));
        }

        // Check 3: Semantic alignment (warning-grade)
        let insight_text = input.insight_text.to_lowercase();
        let text_mentions_turn_tag = input
            .turn_tags
            .iter()
            .any(|tag| tag_stem_in_text(tag, &insight_text));
        if !input.insight_tags.is_empty()
            && citation.semantic_match.is_empty()
            && !text_mentions_turn_tag
        {
            issues.push(format!(
                "weak semantic alignment for turn {}",
                citation.turn_id
            ));
        }

        let status = if issues.is_empty() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Warning
        };

        debug!(
            turn_id = citation.turn_id,
            status = %status,
            issue_count = issues.len(),
            "Citation validation complete"
        );

        let report = json!({
            "validator": "CitationValidator",
            "turn_id": citation.turn_id,
            "quote_similarity": similarity,
            "checks": {
                "quote_fidelity": !issues.iter().any(|i| i.contains("quote not found")),
                "relevance_floor": citation.relevance_score >= self.params.relevance_floor,
                "semantic_alignment": !issues.iter().any(|i| i.contains("semantic")),
            }
        });

        ValidationResult {
            status,
            score: citation.relevance_score,
            issues,
            report,
        }
    }
}

/// True when the tag's leading stem ("security" from "security_concern")
/// appears in the insight text
fn tag_stem_in_text(tag: &str, text: &str) -> bool {
    tag.split('_')
        .next()
        .map(|stem| !stem.is_empty() && text.contains(stem))
        .unwrap_or(false)
}

#[async_trait]
impl Validation for CitationValidator {
    type Input = CitationCheckInput;

    fn name(&self) -> &'static str {
        "CitationValidator"
    }

    async fn validate(&self, input: &Self::Input) -> Result<ValidationResult, ValidationError> {
        Ok(self.check_citation(input))
    }
}
