//! Tier 1 extraction: per-turn semantic tags and key phrases
//!
//! Extraction is pure and total: it depends only on one turn's text and
//! annotation, and no annotation value is fatal. Turns within an interview
//! can therefore be extracted independently and in any order.

pub mod phrase_extractor;
pub mod tag_extractor;

pub use phrase_extractor::PhraseExtractor;
pub use tag_extractor::TagExtractor;

use qice_common::annotation::TurnAnnotation;
use qice_common::citation::TurnCitationMetadata;

/// Produce the full per-turn extraction output for the storage contract
///
/// Combines both extractors into one `TurnCitationMetadata` record.
pub fn extract_turn_metadata(
    turn: &TurnAnnotation,
    tags: &TagExtractor,
    phrases: &PhraseExtractor,
) -> TurnCitationMetadata {
    let semantic_tags = tags.extract(turn).into_iter().collect();
    let extraction = phrases.extract(turn);

    TurnCitationMetadata {
        turn_id: turn.turn_id,
        semantic_tags,
        key_phrases: extraction.key_phrases,
        quotable_segments: extraction.quotable_segments,
        context_dependency: extraction.context_dependency,
        standalone_clarity: extraction.standalone_clarity,
    }
}
