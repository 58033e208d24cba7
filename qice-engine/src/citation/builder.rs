//! Citation Builder (Tier 2)
//!
//! Constructs one `InsightCitation` from an insight seed and the interview's
//! known turn set.
//!
//! # Relevance Scoring
//! Per candidate turn:
//! - Base: 0.5
//! - + 0.3 x tag-overlap ratio (shared tags / insight tag count)
//! - + 0.2 if the annotator's quote is a literal substring of the turn text
//! - Clamped to 0.0-1.0
//!
//! # Reference Handling
//! An unknown turn id never fails the whole insight: the reference is skipped
//! and recorded in the rejected list so the caller can surface it. An insight
//! whose references all reject arrives at validation as uncited - flagged,
//! not dropped.
//!
//! # Confidence
//! An insight with zero primary citations has its confidence capped at 0.3
//! regardless of supporting citation count. Primary evidence is a hard design
//! rule, not one additive factor among others.

use crate::citation::TurnSet;
use crate::taxonomy::TagTaxonomy;
use crate::types::SemanticTag;
use qice_common::annotation::{CitationDetail, InsightSeed};
use qice_common::citation::{CitationState, ContributionType, InsightCitation, TurnCitation};
use qice_common::params::ScoringParams;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A citation reference that could not be resolved
#[derive(Debug, Clone)]
pub struct RejectedReference {
    /// The unresolvable turn id
    pub turn_id: u32,
    /// Why the reference was rejected
    pub reason: String,
}

/// Construction result: the citation plus any rejected references
#[derive(Debug, Clone)]
pub struct BuiltCitation {
    /// The constructed insight citation
    pub citation: InsightCitation,
    /// References skipped during construction (recorded, not fatal)
    pub rejected_references: Vec<RejectedReference>,
}

/// Citation Builder
pub struct CitationBuilder {
    params: ScoringParams,
}

impl CitationBuilder {
    /// Create a builder with the given scoring parameters
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Construct the citation for one insight
    ///
    /// `insight_id` is assigned by the caller (unique within the analysis
    /// run); `synthesis_note` overrides the generated template when supplied.
    pub fn create_citation(
        &self,
        seed: &InsightSeed,
        insight_id: &str,
        taxonomy: &TagTaxonomy,
        turns: &TurnSet,
        synthesis_note: Option<&str>,
    ) -> BuiltCitation {
        let insight_tags = taxonomy.theme_tags(&seed.theme);

        let mut primary_citations = Vec::new();
        let mut supporting_citations = Vec::new();
        let mut rejected_references = Vec::new();

        for detail in self.candidate_details(seed) {
            let record = match turns.get(detail.turn_id) {
                Some(record) => record,
                None => {
                    warn!(
                        insight_id,
                        turn_id = detail.turn_id,
                        "Citation references unknown turn; skipping"
                    );
                    rejected_references.push(RejectedReference {
                        turn_id: detail.turn_id,
                        reason: format!("turn {} not found in interview", detail.turn_id),
                    });
                    continue;
                }
            };

            let shared: Vec<SemanticTag> = insight_tags
                .intersection(&record.tags)
                .cloned()
                .collect();
            let relevance_score =
                self.relevance_score(&insight_tags, shared.len(), detail.quote.as_deref(), &record.text);

            let citation = TurnCitation {
                turn_id: detail.turn_id,
                contribution_type: detail.contribution_type,
                relevance_score,
                specific_element: detail.quote.clone().unwrap_or_default(),
                semantic_match: shared,
                state: CitationState::Unvalidated,
            };

            if detail.contribution_type.is_primary() {
                primary_citations.push(citation);
            } else {
                supporting_citations.push(citation);
            }
        }

        let confidence = self.confidence(&primary_citations, &supporting_citations);
        let note = synthesis_note.map(String::from).unwrap_or_else(|| {
            format!(
                "{} primary and {} supporting turns evidence the '{}' {}",
                primary_citations.len(),
                supporting_citations.len(),
                seed.theme,
                seed.insight_type
            )
        });

        debug!(
            insight_id,
            primary = primary_citations.len(),
            supporting = supporting_citations.len(),
            rejected = rejected_references.len(),
            confidence,
            "Constructed insight citation"
        );

        BuiltCitation {
            citation: InsightCitation {
                insight_id: insight_id.to_string(),
                insight_type: seed.insight_type.clone(),
                theme: seed.theme.clone(),
                primary_citations,
                supporting_citations,
                synthesis_note: note,
                confidence,
            },
            rejected_references,
        }
    }

    /// Every turn reference across primary and supporting sets that does not
    /// resolve in the known turn set, as `missing_turn` issues
    pub fn validate_citations(&self, citations: &[InsightCitation], turns: &TurnSet) -> Vec<String> {
        let mut issues = Vec::new();
        for citation in citations {
            for turn_citation in citation
                .primary_citations
                .iter()
                .chain(citation.supporting_citations.iter())
            {
                if !turns.contains(turn_citation.turn_id) {
                    issues.push(format!(
                        "missing turn {} referenced by insight {}",
                        turn_citation.turn_id, citation.insight_id
                    ));
                }
            }
        }
        issues
    }

    /// The annotator's citation details, completed with bare supporting
    /// entries for shortlisted turn ids that carry no detail
    fn candidate_details(&self, seed: &InsightSeed) -> Vec<CitationDetail> {
        let mut details = seed.citations.citation_details.clone();
        let detailed: BTreeSet<u32> = details.iter().map(|d| d.turn_id).collect();

        for &turn_id in &seed.citations.turn_ids {
            if !detailed.contains(&turn_id) {
                details.push(CitationDetail {
                    turn_id,
                    contribution_type: ContributionType::Supporting,
                    quote: None,
                    reason: None,
                });
            }
        }
        details
    }

    /// Relevance score for one candidate turn
    fn relevance_score(
        &self,
        insight_tags: &BTreeSet<SemanticTag>,
        shared_count: usize,
        quote: Option<&str>,
        turn_text: &str,
    ) -> f64 {
        let overlap_ratio = if insight_tags.is_empty() {
            0.0
        } else {
            shared_count as f64 / insight_tags.len() as f64
        };

        let mut score = self.params.relevance_base
            + self.params.relevance_tag_overlap_weight * overlap_ratio;

        if let Some(quote) = quote {
            if !quote.is_empty() && turn_text.contains(quote) {
                score += self.params.relevance_quote_bonus;
            }
        }

        score.clamp(0.0, 1.0)
    }

    /// Overall insight confidence
    ///
    /// With primary evidence: a weighted blend of mean primary relevance and
    /// capped primary/supporting counts. Without: hard-capped at
    /// `uncited_confidence_cap` (0.3) - an insight with no primary evidence
    /// is definitionally weak.
    fn confidence(&self, primary: &[TurnCitation], supporting: &[TurnCitation]) -> f64 {
        if primary.is_empty() {
            let fallback = 0.15 + 0.05 * (supporting.len().min(3) as f64);
            return fallback.min(self.params.uncited_confidence_cap);
        }

        let mean_primary_relevance =
            primary.iter().map(|c| c.relevance_score).sum::<f64>() / primary.len() as f64;
        let primary_count_factor = (primary.len().min(2) as f64) / 2.0;
        let supporting_count_factor = (supporting.len().min(3) as f64) / 3.0;

        let confidence = self.params.confidence_primary_relevance_weight * mean_primary_relevance
            + self.params.confidence_primary_count_weight * primary_count_factor
            + self.params.confidence_supporting_count_weight * supporting_count_factor;

        confidence.clamp(0.0, 1.0)
    }
}
