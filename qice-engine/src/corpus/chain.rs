//! Citation chain resolution
//!
//! Resolves a corpus insight down to literal turn text: corpus → interview →
//! turns. This is the single function that proves end-to-end traceability,
//! so every hop is an exact id join - an unresolvable reference is an error,
//! never an approximate substitute.

use crate::corpus::aggregator::{CorpusAggregator, CorpusInsight};
use crate::corpus::InterviewCitationSet;
use crate::types::AggregationError;
use qice_common::citation::{
    CitationChain, CorpusInsightCitation, InterviewChainLink, TurnChainLink,
};
use tracing::debug;

/// Resolve the full citation chain for one corpus insight
///
/// # Errors
/// Returns `AggregationError::UnresolvedReference` when an interview id,
/// insight id, or primary turn id fails its exact join - that indicates the
/// corpus snapshot and the insight went out of sync, which must surface
/// rather than degrade into fuzzy matching.
pub fn get_full_citation_chain(
    insight: &CorpusInsight,
    interviews: &[InterviewCitationSet],
) -> Result<CitationChain, AggregationError> {
    let mut links = Vec::with_capacity(insight.supporting_interviews.len());

    for citation in &insight.supporting_interviews {
        let interview = interviews
            .iter()
            .find(|i| i.interview_id == citation.interview_id)
            .ok_or_else(|| {
                AggregationError::UnresolvedReference(format!(
                    "interview {} not in corpus snapshot",
                    citation.interview_id
                ))
            })?;

        let summary = interview
            .insights
            .iter()
            .find(|s| s.insight_id == citation.insight_id)
            .ok_or_else(|| {
                AggregationError::UnresolvedReference(format!(
                    "insight {} not found in interview {}",
                    citation.insight_id, citation.interview_id
                ))
            })?;

        let mut turns = Vec::with_capacity(summary.primary_turn_ids.len());
        for turn_id in &summary.primary_turn_ids {
            let text = interview.turn_texts.get(turn_id).ok_or_else(|| {
                AggregationError::UnresolvedReference(format!(
                    "turn {} not found in interview {}",
                    turn_id, citation.interview_id
                ))
            })?;
            turns.push(TurnChainLink {
                turn_id: *turn_id,
                text: text.clone(),
            });
        }

        links.push(InterviewChainLink {
            interview_id: citation.interview_id.clone(),
            insight_id: citation.insight_id.clone(),
            relevance: citation.relevance,
            turns,
        });
    }

    debug!(
        insight_id = %insight.insight_id,
        interview_links = links.len(),
        "Resolved citation chain"
    );

    Ok(CitationChain {
        insight_id: insight.insight_id.clone(),
        content: insight.content.clone(),
        interviews: links,
    })
}

/// Assemble the storage-contract record for one corpus insight
pub fn to_citation_record(
    insight: &CorpusInsight,
    interviews: &[InterviewCitationSet],
) -> Result<CorpusInsightCitation, AggregationError> {
    let citation_chain = get_full_citation_chain(insight, interviews)?;
    Ok(CorpusInsightCitation {
        insight_id: insight.insight_id.clone(),
        insight_type: insight.insight_type.clone(),
        supporting_interview_ids: CorpusAggregator::supporting_interview_ids(insight),
        prevalence: insight.prevalence,
        citation_chain,
    })
}
