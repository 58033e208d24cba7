//! Corpus-level aggregation
//!
//! The fan-in stage: indexes every completed interview's insights by
//! normalized theme, finds cross-interview patterns that clear a prevalence
//! threshold, and re-expresses each pattern as a citation chain down to
//! literal turn text.
//!
//! The theme index is an explicit value rebuilt per analysis run and passed
//! around by reference - never ambient state shared across runs.

pub mod aggregator;
pub mod chain;
pub mod theme_index;

pub use aggregator::{CorpusAggregator, CorpusInsight};
pub use chain::{get_full_citation_chain, to_citation_record};
pub use theme_index::{normalize_theme, ThemeIndex, ThemeOccurrence};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One interview's finished citation data, as the aggregator consumes it
///
/// Produced by the workflow after validation; the aggregator never reaches
/// back into annotations or mutates interview-level output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewCitationSet {
    /// Interview identifier
    pub interview_id: String,
    /// Per-insight summaries feeding the theme index
    pub insights: Vec<InsightSummary>,
    /// Literal turn text by id, for citation chain leaves
    pub turn_texts: HashMap<u32, String>,
}

/// The slice of one insight the corpus level needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightSummary {
    /// Insight id within the interview's analysis
    pub insight_id: String,
    /// Insight category ("priority", "narrative", ...)
    pub insight_type: String,
    /// Raw theme as the annotator stated it
    pub theme: String,
    /// Emotional intensity the annotator assigned; becomes the
    /// interview-citation relevance at corpus level
    pub intensity: f64,
    /// Turns cited as primary evidence
    pub primary_turn_ids: Vec<u32>,
}
