//! Tag Extractor (Tier 1)
//!
//! Derives the closed set of semantic tags for one turn by mapping the four
//! upstream annotation axes through the taxonomy's fixed lookup tables and
//! unioning the results.
//!
//! # Axes
//! 1. Functional role (`functional_analysis.primary_function`)
//! 2. Topics (`content_analysis.topics`, each mapped independently)
//! 3. Emotion (`emotional_analysis.primary_emotion`)
//! 4. Evidence type (`evidence_analysis.evidence_type`)
//!
//! No input is fatal: an unknown axis value contributes no tags, and a turn
//! with nothing recognizable simply yields the empty set.

use crate::taxonomy::TagTaxonomy;
use crate::types::SemanticTag;
use qice_common::annotation::TurnAnnotation;
use std::collections::BTreeSet;
use tracing::debug;

/// Tag Extractor
///
/// Holds the taxonomy tables; `extract` is a pure lookup-and-union over one
/// turn's annotation.
pub struct TagExtractor {
    taxonomy: TagTaxonomy,
}

impl TagExtractor {
    /// Create a tag extractor with the standard taxonomy
    pub fn new() -> Self {
        Self {
            taxonomy: TagTaxonomy::new(),
        }
    }

    /// Access the underlying taxonomy (shared with the citation builder for
    /// insight theme tagging)
    pub fn taxonomy(&self) -> &TagTaxonomy {
        &self.taxonomy
    }

    /// Extract the semantic tag set for one turn
    pub fn extract(&self, turn: &TurnAnnotation) -> BTreeSet<SemanticTag> {
        let mut tags = BTreeSet::new();

        if let Some(role) = &turn.functional_analysis.primary_function {
            if let Some(tag) = self.taxonomy.function_tag(role) {
                tags.insert(tag.clone());
            }
        }

        for topic in &turn.content_analysis.topics {
            if let Some(tag) = self.taxonomy.topic_tag(topic) {
                tags.insert(tag.clone());
            }
        }

        if let Some(emotion) = &turn.emotional_analysis.primary_emotion {
            if let Some(tag) = self.taxonomy.emotion_tag(emotion) {
                tags.insert(tag.clone());
            }
        }

        if let Some(evidence_type) = &turn.evidence_analysis.evidence_type {
            if let Some(tag) = self.taxonomy.evidence_tag(evidence_type) {
                tags.insert(tag.clone());
            }
        }

        debug!(
            turn_id = turn.turn_id,
            tag_count = tags.len(),
            "Extracted semantic tags"
        );

        tags
    }
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new()
    }
}
