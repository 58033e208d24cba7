//! Tier 2 citation construction
//!
//! Turns an insight's raw citation intent into structured, relevance-scored
//! citations against the interview's known turn set.

pub mod builder;

pub use builder::{BuiltCitation, CitationBuilder, RejectedReference};

use crate::extractors::TagExtractor;
use crate::types::SemanticTag;
use qice_common::annotation::TurnAnnotation;
use std::collections::{BTreeSet, HashMap};

/// One turn's ground truth as seen by construction and validation
#[derive(Debug, Clone)]
pub struct TurnRecord {
    /// Turn id within the interview
    pub turn_id: u32,
    /// Literal turn text
    pub text: String,
    /// Semantic tags extracted from the turn's annotation
    pub tags: BTreeSet<SemanticTag>,
}

/// The known turn set of one interview
///
/// Preserves interview order (needed for the spread component of interview
/// quality scoring) and answers id lookups exactly - citation resolution
/// never falls back to fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct TurnSet {
    records: HashMap<u32, TurnRecord>,
    order: Vec<u32>,
}

impl TurnSet {
    /// Build the turn set for one interview, extracting tags per turn
    pub fn from_turns(turns: &[TurnAnnotation], extractor: &TagExtractor) -> Self {
        let mut records = HashMap::with_capacity(turns.len());
        let mut order = Vec::with_capacity(turns.len());

        for turn in turns {
            records.insert(
                turn.turn_id,
                TurnRecord {
                    turn_id: turn.turn_id,
                    text: turn.text.clone(),
                    tags: extractor.extract(turn),
                },
            );
            order.push(turn.turn_id);
        }

        Self { records, order }
    }

    /// Exact lookup by turn id
    pub fn get(&self, turn_id: u32) -> Option<&TurnRecord> {
        self.records.get(&turn_id)
    }

    /// True when the id resolves within this interview
    pub fn contains(&self, turn_id: u32) -> bool {
        self.records.contains_key(&turn_id)
    }

    /// Position of a turn in interview order
    pub fn position(&self, turn_id: u32) -> Option<usize> {
        self.order.iter().position(|id| *id == turn_id)
    }

    /// Number of turns in the interview
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for an interview with no turns
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
