//! Workflow orchestration
//!
//! Fans out one task per interview (tag extraction → citation construction →
//! validation), joins, then runs the corpus aggregation fan-in. Interviews
//! share no mutable state; each task produces an owned `InterviewAnalysis`
//! merged by the orchestrator.

pub mod orchestrator;

pub use orchestrator::{process_interview, AnalysisPipeline, PipelineConfig};

use crate::corpus::{CorpusInsight, InterviewCitationSet};
use crate::types::ValidationResult;
use crate::validators::ValidationReport;
use qice_common::citation::{CorpusInsightCitation, InterviewInsightCitation, TurnCitationMetadata};
use uuid::Uuid;

/// One interview's complete analysis output
#[derive(Debug, Clone)]
pub struct InterviewAnalysis {
    /// Interview identifier
    pub interview_id: String,
    /// Per-turn extraction output (storage contract)
    pub turn_metadata: Vec<TurnCitationMetadata>,
    /// Per-insight citation records (storage contract)
    pub insight_citations: Vec<InterviewInsightCitation>,
    /// The slice of this interview the corpus aggregation consumes
    pub citation_set: InterviewCitationSet,
    /// Interview-level validation outcome (coverage + quality)
    pub validation: ValidationResult,
}

/// An interview that failed input validation
///
/// Recorded so the run report can surface it; the rest of the corpus is
/// unaffected.
#[derive(Debug, Clone)]
pub struct FailedInterview {
    /// Interview identifier
    pub interview_id: String,
    /// The input validation error
    pub error: String,
}

/// Output of one full corpus analysis run
#[derive(Debug, Clone)]
pub struct CorpusAnalysis {
    /// Analysis run id
    pub run_id: Uuid,
    /// Successfully analyzed interviews
    pub interviews: Vec<InterviewAnalysis>,
    /// Interviews rejected by input validation
    pub failed_interviews: Vec<FailedInterview>,
    /// Cross-interview patterns found at the configured prevalence threshold
    pub patterns: Vec<CorpusInsight>,
    /// Storage-contract records with resolved citation chains
    pub pattern_records: Vec<CorpusInsightCitation>,
    /// Session validation report (always accompanies citation output)
    pub report: ValidationReport,
}
