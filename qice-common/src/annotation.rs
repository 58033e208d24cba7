//! Annotator input contract types
//!
//! Structures received from the LLM annotator collaborator. The four analysis
//! axes (functional, content, emotional, evidence) are explicitly modeled
//! rather than passed around as untyped maps, so a missing key is a parse-time
//! concern instead of a scattered runtime one.
//!
//! Annotation values themselves stay permissive: unknown axis values are plain
//! strings that simply map to no semantic tags downstream. The only fatal
//! input conditions are structural (duplicate turn ids, an insight without a
//! type), checked by [`InterviewAnnotation::validate`].

use crate::citation::ContributionType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Functional analysis axis: what role the turn plays in the conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionalAnalysis {
    /// Primary functional role (e.g. "problem_identification", "proposal")
    #[serde(default)]
    pub primary_function: Option<String>,
}

/// Content analysis axis: what the turn talks about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Topic labels assigned by the annotator (e.g. "security", "housing")
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Emotional analysis axis: how the turn is said
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionalAnalysis {
    /// Dominant emotion label (e.g. "fear", "frustration")
    #[serde(default)]
    pub primary_emotion: Option<String>,
    /// Emotional intensity (0.0-1.0)
    #[serde(default)]
    pub emotional_intensity: f64,
}

/// Evidence analysis axis: what kind of ground the turn stands on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceAnalysis {
    /// Evidence type label (e.g. "personal_experience", "hearsay")
    #[serde(default)]
    pub evidence_type: Option<String>,
}

/// One annotated conversation turn
///
/// Immutable once produced upstream; owned by the interview it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnAnnotation {
    /// Turn id, unique within the interview
    pub turn_id: u32,
    /// Speaker role (e.g. "participant", "interviewer")
    pub speaker: String,
    /// Literal turn text
    pub text: String,
    /// Functional role axis
    #[serde(default)]
    pub functional_analysis: FunctionalAnalysis,
    /// Topic axis
    #[serde(default)]
    pub content_analysis: ContentAnalysis,
    /// Emotion axis
    #[serde(default)]
    pub emotional_analysis: EmotionalAnalysis,
    /// Evidence axis
    #[serde(default)]
    pub evidence_analysis: EvidenceAnalysis,
}

/// Raw citation intent attached to an insight by the annotator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationIntent {
    /// Candidate turn ids the annotator pointed at
    #[serde(default)]
    pub turn_ids: Vec<u32>,
    /// Per-turn evidentiary details
    #[serde(default)]
    pub citation_details: Vec<CitationDetail>,
}

/// Evidentiary detail for one candidate turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationDetail {
    /// Candidate turn id
    pub turn_id: u32,
    /// How the annotator classified this turn's contribution
    pub contribution_type: ContributionType,
    /// Text the annotator quoted from the turn (may be paraphrased)
    #[serde(default)]
    pub quote: Option<String>,
    /// Annotator's stated reason for the citation
    #[serde(default)]
    pub reason: Option<String>,
}

/// One interview-level insight as produced upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSeed {
    /// Insight category ("priority", "narrative", ...)
    pub insight_type: String,
    /// Theme the insight is about (normalized downstream for indexing)
    pub theme: String,
    /// Insight content text, when the annotator produced one
    #[serde(default)]
    pub content: Option<String>,
    /// Emotional intensity the annotator assigned to the insight (0.0-1.0);
    /// carried into corpus-level interview citations as relevance
    #[serde(default)]
    pub intensity: f64,
    /// Raw citation intent; absent means the insight arrived uncited
    #[serde(default)]
    pub citations: CitationIntent,
}

impl InsightSeed {
    /// True when the annotator attached no citation intent at all
    pub fn is_uncited(&self) -> bool {
        self.citations.turn_ids.is_empty() && self.citations.citation_details.is_empty()
    }
}

/// A full interview's annotation bundle: turns plus interview-level insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewAnnotation {
    /// Interview identifier
    pub interview_id: String,
    /// Annotated turns, read-only after upstream annotation
    pub turns: Vec<TurnAnnotation>,
    /// Interview-level insights with raw citation intent
    #[serde(default)]
    pub insights: Vec<InsightSeed>,
}

impl InterviewAnnotation {
    /// Structural validation of one interview's input
    ///
    /// Malformed input is the only fatal condition in the engine: it aborts
    /// processing of this interview while leaving others unaffected. Checks:
    /// - duplicate turn ids
    /// - insight with an empty `insight_type`
    pub fn validate(&self) -> Result<()> {
        if self.interview_id.trim().is_empty() {
            return Err(Error::InvalidInput("interview_id is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for turn in &self.turns {
            if !seen.insert(turn.turn_id) {
                return Err(Error::InvalidInput(format!(
                    "interview {}: duplicate turn id {}",
                    self.interview_id, turn.turn_id
                )));
            }
        }

        for (i, insight) in self.insights.iter().enumerate() {
            if insight.insight_type.trim().is_empty() {
                return Err(Error::InvalidInput(format!(
                    "interview {}: insight {} has no insight_type",
                    self.interview_id, i
                )));
            }
        }

        Ok(())
    }

    /// Look up a turn by id
    pub fn turn(&self, turn_id: u32) -> Option<&TurnAnnotation> {
        self.turns.iter().find(|t| t.turn_id == turn_id)
    }
}
