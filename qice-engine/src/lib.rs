//! QICE analysis engine
//!
//! Builds and validates the three-level evidentiary citation chain over
//! annotated interview data:
//!
//! - **Tier 1 - Extraction**: semantic tags and ranked key phrases per turn
//! - **Tier 2 - Construction**: per-insight citations with relevance scoring
//! - **Tier 3 - Validation**: quote fidelity, relevance, semantic alignment,
//!   interview-level coverage and quality
//! - **Fan-in - Aggregation**: corpus-level patterns with prevalence,
//!   confidence, and full citation chains down to literal turn text
//!
//! Data flows strictly upward; no tier mutates another tier's output in
//! place. The workflow module fans out one task per interview and joins
//! before aggregation.

pub mod citation;
pub mod corpus;
pub mod extractors;
pub mod taxonomy;
pub mod types;
pub mod validators;
pub mod workflow;

pub use crate::citation::CitationBuilder;
pub use crate::corpus::CorpusAggregator;
pub use crate::extractors::{PhraseExtractor, TagExtractor};
pub use crate::types::{ValidationResult, ValidationStatus};
pub use crate::validators::{CitationValidator, InterviewValidator};
pub use crate::workflow::AnalysisPipeline;
