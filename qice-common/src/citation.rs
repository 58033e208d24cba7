//! Citation contract types
//!
//! Structures exchanged with the storage collaborator. Field names and nesting
//! are a persistence contract: stored analysis data is read back against these
//! exact shapes, so renames here are breaking changes.
//!
//! Three output levels:
//! - `TurnCitationMetadata` - per-turn extraction output (tags, key phrases)
//! - `InterviewInsightCitation` - per-insight citation record
//! - `CorpusInsightCitation` - cross-interview pattern with citation chain

use serde::{Deserialize, Serialize};

/// How a cited turn contributes to an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    /// Strongest direct evidence for the insight
    PrimaryEvidence,
    /// Corroborating evidence
    Supporting,
    /// Background context
    Contextual,
    /// Evidence cutting against the insight (retained, never dropped)
    Contradictory,
}

impl ContributionType {
    /// True for citations classified into the primary set
    pub fn is_primary(&self) -> bool {
        matches!(self, ContributionType::PrimaryEvidence)
    }
}

/// Validation lifecycle state of a citation
///
/// Citations pass through `Unvalidated → Validated | Flagged`. Flagged
/// citations are retained with their issues so the quality trail stays
/// auditable; there is no terminal rejected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationState {
    /// Not yet checked against ground truth
    Unvalidated,
    /// All checks passed
    Validated,
    /// One or more checks raised issues (advisory, for human review)
    Flagged,
}

impl Default for CitationState {
    fn default() -> Self {
        CitationState::Unvalidated
    }
}

/// A structured link from an insight to one turn that evidences it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnCitation {
    /// Cited turn id; must resolve within the same interview's turn set
    pub turn_id: u32,
    /// How this turn contributes to the insight
    pub contribution_type: ContributionType,
    /// Relevance score (0.0-1.0)
    pub relevance_score: f64,
    /// Quoted text drawn from the turn
    pub specific_element: String,
    /// Semantic tags shared between the turn and the insight
    pub semantic_match: Vec<String>,
    /// Validation state (advisory; flagged citations are never deleted)
    #[serde(default)]
    pub state: CitationState,
}

/// One interview-level insight with its evidentiary citations
///
/// An insight with zero primary citations is definitionally weak: its
/// confidence is capped at 0.3 by the builder and it is flagged by the
/// validators, never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightCitation {
    /// Insight identifier within the analysis run
    pub insight_id: String,
    /// Insight category ("priority", "narrative", ...)
    pub insight_type: String,
    /// Normalized theme this insight is about
    pub theme: String,
    /// Citations with relevance typically above 0.8
    pub primary_citations: Vec<TurnCitation>,
    /// Citations with relevance typically 0.5-0.8
    pub supporting_citations: Vec<TurnCitation>,
    /// How the cited turns jointly support the insight (descriptive only,
    /// never used in scoring)
    pub synthesis_note: String,
    /// Overall confidence (0.0-1.0); capped at 0.3 when no primary evidence
    pub confidence: f64,
}

impl InsightCitation {
    /// Ids of turns cited as primary evidence
    pub fn primary_turn_ids(&self) -> Vec<u32> {
        self.primary_citations.iter().map(|c| c.turn_id).collect()
    }

    /// Ids of turns cited as supporting evidence
    pub fn supporting_turn_ids(&self) -> Vec<u32> {
        self.supporting_citations.iter().map(|c| c.turn_id).collect()
    }

    /// True when the insight has no primary evidence at all
    pub fn is_uncited(&self) -> bool {
        self.primary_citations.is_empty() && self.supporting_citations.is_empty()
    }
}

/// A ranked key phrase extracted from a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPhrase {
    /// Phrase text (a sentence-like segment of the turn)
    pub text: String,
    /// Byte offset of the segment start within the turn text
    pub start_char: usize,
    /// Byte offset one past the segment end
    pub end_char: usize,
    /// Heuristic importance (0.0-1.0)
    pub importance: f64,
}

/// Per-turn extraction output for the storage collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnCitationMetadata {
    /// Turn id within the interview
    pub turn_id: u32,
    /// Semantic tags derived from the turn's annotation
    pub semantic_tags: Vec<String>,
    /// Ranked key phrases (top 5)
    pub key_phrases: Vec<KeyPhrase>,
    /// Segments suitable as standalone quotes
    pub quotable_segments: Vec<String>,
    /// How much surrounding context the turn needs to be understood (0.0-1.0)
    pub context_dependency: f64,
    /// How well the turn reads in isolation (0.0-1.0)
    pub standalone_clarity: f64,
}

/// Per-insight citation record for the storage collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewInsightCitation {
    /// Interview this record belongs to
    pub interview_id: String,
    /// Insight category ("priority", "narrative", ...)
    pub insight_type: String,
    /// Insight identifier within the analysis run
    pub insight_id: String,
    /// Full citation payload (primary/supporting sets, synthesis note)
    pub citation_data: InsightCitation,
    /// Ids of turns cited as primary evidence
    pub primary_turn_ids: Vec<u32>,
    /// Ids of turns cited as supporting evidence
    pub supporting_turn_ids: Vec<u32>,
    /// Overall insight confidence (0.0-1.0)
    pub confidence_score: f64,
}

/// Corpus-level analogue of TurnCitation: links a corpus pattern to one
/// interview's insight by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewCitation {
    /// Supporting interview id
    pub interview_id: String,
    /// Insight id within that interview's analysis
    pub insight_id: String,
    /// Relevance taken from the interview's own insight (e.g. its
    /// emotional intensity)
    pub relevance: f64,
}

/// Cross-interview pattern record for the storage collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusInsightCitation {
    /// Corpus insight identifier
    pub insight_id: String,
    /// Insight category the pattern aggregates over
    pub insight_type: String,
    /// Contributing interview ids
    pub supporting_interview_ids: Vec<String>,
    /// Fraction of interviews exhibiting the pattern (0.0-1.0), always
    /// recomputed from the corpus snapshot
    pub prevalence: f64,
    /// Full corpus → interview → turn evidence chain
    pub citation_chain: CitationChain,
}

/// Nested evidence chain: corpus insight → interviews → turns
///
/// The leaves carry literal turn text so a reader can verify every level of
/// the chain without a storage lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationChain {
    /// Corpus insight id this chain belongs to
    pub insight_id: String,
    /// Pattern content description
    pub content: String,
    /// Per-interview links, one per supporting interview
    pub interviews: Vec<InterviewChainLink>,
}

/// One interview's contribution to a corpus citation chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewChainLink {
    /// Supporting interview id
    pub interview_id: String,
    /// The interview-level insight id that was joined (exact id, never fuzzy)
    pub insight_id: String,
    /// Relevance carried from the InterviewCitation
    pub relevance: f64,
    /// Primary-evidence turns with literal text
    pub turns: Vec<TurnChainLink>,
}

/// Leaf of a citation chain: one turn with its literal text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnChainLink {
    /// Turn id within the interview
    pub turn_id: u32,
    /// Literal turn text
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_insight_citation() -> InsightCitation {
        InsightCitation {
            insight_id: "priority_0".to_string(),
            insight_type: "priority".to_string(),
            theme: "security".to_string(),
            primary_citations: vec![TurnCitation {
                turn_id: 7,
                contribution_type: ContributionType::PrimaryEvidence,
                relevance_score: 1.0,
                specific_element: "pensando en los robos".to_string(),
                semantic_match: vec!["security_concern".to_string()],
                state: CitationState::Unvalidated,
            }],
            supporting_citations: vec![TurnCitation {
                turn_id: 12,
                contribution_type: ContributionType::Supporting,
                relevance_score: 0.65,
                specific_element: String::new(),
                semantic_match: vec![],
                state: CitationState::Unvalidated,
            }],
            synthesis_note: "1 primary and 1 supporting turn evidence this priority".to_string(),
            confidence: 0.83,
        }
    }

    #[test]
    fn test_insight_citation_round_trip() {
        let original = sample_insight_citation();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: InsightCitation = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.primary_citations.len(), 1);
        assert_eq!(parsed.supporting_citations.len(), 1);
        assert_eq!(parsed.primary_citations[0].turn_id, 7);
        assert_eq!(parsed.confidence, original.confidence);
    }

    #[test]
    fn test_contribution_type_wire_format() {
        let json = serde_json::to_string(&ContributionType::PrimaryEvidence).unwrap();
        assert_eq!(json, "\"primary_evidence\"");

        let parsed: ContributionType = serde_json::from_str("\"contradictory\"").unwrap();
        assert_eq!(parsed, ContributionType::Contradictory);
    }

    #[test]
    fn test_citation_state_defaults_to_unvalidated() {
        // TurnCitation payloads stored before validation ran carry no state field
        let json = r#"{
            "turn_id": 3,
            "contribution_type": "supporting",
            "relevance_score": 0.6,
            "specific_element": "",
            "semantic_match": []
        }"#;
        let citation: TurnCitation = serde_json::from_str(json).unwrap();
        assert_eq!(citation.state, CitationState::Unvalidated);
    }

    #[test]
    fn test_turn_id_accessors_preserve_order() {
        let insight = sample_insight_citation();
        assert_eq!(insight.primary_turn_ids(), vec![7]);
        assert_eq!(insight.supporting_turn_ids(), vec![12]);
        assert!(!insight.is_uncited());
    }

    #[test]
    fn test_corpus_citation_field_names() {
        let record = CorpusInsightCitation {
            insight_id: "corpus_priority_security".to_string(),
            insight_type: "priority".to_string(),
            supporting_interview_ids: vec!["int_001".to_string()],
            prevalence: 0.73,
            citation_chain: CitationChain {
                insight_id: "corpus_priority_security".to_string(),
                content: "security".to_string(),
                interviews: vec![],
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("supporting_interview_ids").is_some());
        assert!(value.get("prevalence").is_some());
        assert!(value.get("citation_chain").is_some());
    }
}
