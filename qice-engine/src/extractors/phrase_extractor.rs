//! Phrase Extractor (Tier 1)
//!
//! Splits a turn into sentence-like segments and ranks them by a heuristic
//! importance score, keeping the top 5. Also derives the quote-oriented
//! metadata fields: quotable segments, context dependency, and standalone
//! clarity.
//!
//! # Scoring Algorithm
//! Per segment (segments under 20 chars are discarded):
//! - Base importance: 0.5
//! - + emotional_intensity x 0.2
//! - + 0.2 if the segment contains one of the turn's topic keywords
//! - + 0.1 if the turn's evidence type is personal experience
//! - Clamped to 0.0-1.0; ties broken by original order (stable sort)
//!
//! This is a tunable heuristic ranking, not a proof of relevance. The
//! constants live in `ScoringParams` so a run can adjust them; the defaults
//! reproduce the inherited behavior.

use qice_common::annotation::TurnAnnotation;
use qice_common::citation::KeyPhrase;
use qice_common::params::ScoringParams;
use tracing::debug;

/// Sentence segment delimiters
const SEGMENT_DELIMITERS: [char; 3] = ['.', '!', '?'];

/// Words that mark a segment as leaning on prior discourse (Spanish and
/// English, matching the annotator's corpus languages)
const CONNECTIVE_OPENERS: [&str; 18] = [
    "pero", "porque", "entonces", "y", "o", "eso", "esa", "ese", "tambien", "aunque", "but",
    "because", "and", "so", "that", "then", "also", "though",
];

/// Result of phrase extraction for one turn
#[derive(Debug, Clone)]
pub struct PhraseExtraction {
    /// Top-ranked key phrases (at most `phrase_top_n`)
    pub key_phrases: Vec<KeyPhrase>,
    /// Segments usable as standalone quotes
    pub quotable_segments: Vec<String>,
    /// Fraction of segments that open with a discourse connective (0.0-1.0)
    pub context_dependency: f64,
    /// How well the turn reads in isolation (0.0-1.0)
    pub standalone_clarity: f64,
}

/// One raw segment with its character offsets into the turn text
#[derive(Debug, Clone)]
struct Segment {
    text: String,
    start_char: usize,
    end_char: usize,
}

/// Phrase Extractor
pub struct PhraseExtractor {
    params: ScoringParams,
}

impl PhraseExtractor {
    /// Create a phrase extractor with the given scoring parameters
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Extract ranked key phrases and quote metadata for one turn
    pub fn extract(&self, turn: &TurnAnnotation) -> PhraseExtraction {
        let segments = segment_text(&turn.text);
        if segments.is_empty() {
            return PhraseExtraction {
                key_phrases: vec![],
                quotable_segments: vec![],
                context_dependency: 0.0,
                standalone_clarity: 0.0,
            };
        }

        let topic_keywords: Vec<String> = turn
            .content_analysis
            .topics
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let is_personal_experience = turn
            .evidence_analysis
            .evidence_type
            .as_deref()
            .map(|e| e.trim().eq_ignore_ascii_case("personal_experience"))
            .unwrap_or(false);

        let intensity = turn.emotional_analysis.emotional_intensity.clamp(0.0, 1.0);

        // Score segments that meet the length floor
        let mut scored: Vec<KeyPhrase> = segments
            .iter()
            .filter(|s| s.text.chars().count() >= self.params.phrase_min_segment_chars)
            .map(|s| {
                let importance = self.score_segment(s, &topic_keywords, intensity, is_personal_experience);
                KeyPhrase {
                    text: s.text.clone(),
                    start_char: s.start_char,
                    end_char: s.end_char,
                    importance,
                }
            })
            .collect();

        // Stable sort keeps original order on ties
        scored.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.params.phrase_top_n);

        let (context_dependency, standalone_clarity) = self.quote_heuristics(&segments);
        let quotable_segments = self.quotable_segments(&segments);

        debug!(
            turn_id = turn.turn_id,
            phrase_count = scored.len(),
            quotable_count = quotable_segments.len(),
            context_dependency,
            "Extracted key phrases"
        );

        PhraseExtraction {
            key_phrases: scored,
            quotable_segments,
            context_dependency,
            standalone_clarity,
        }
    }

    /// Heuristic importance for one segment
    fn score_segment(
        &self,
        segment: &Segment,
        topic_keywords: &[String],
        intensity: f64,
        is_personal_experience: bool,
    ) -> f64 {
        let mut score = self.params.phrase_base_importance;
        score += intensity * self.params.phrase_intensity_weight;

        let lowered = segment.text.to_lowercase();
        if topic_keywords.iter().any(|kw| lowered.contains(kw.as_str())) {
            score += self.params.phrase_topic_bonus;
        }
        if is_personal_experience {
            score += self.params.phrase_experience_bonus;
        }

        score.clamp(0.0, 1.0)
    }

    /// Segments suitable as standalone quotes: within the length band and not
    /// opening with a discourse connective
    fn quotable_segments(&self, segments: &[Segment]) -> Vec<String> {
        segments
            .iter()
            .filter(|s| {
                let len = s.text.chars().count();
                len >= self.params.phrase_min_segment_chars
                    && len <= self.params.quotable_max_segment_chars
                    && !opens_with_connective(&s.text)
            })
            .map(|s| s.text.clone())
            .collect()
    }

    /// Context-dependency and standalone-clarity heuristics over all segments
    fn quote_heuristics(&self, segments: &[Segment]) -> (f64, f64) {
        let total = segments.len() as f64;
        let connective_openers = segments
            .iter()
            .filter(|s| opens_with_connective(&s.text))
            .count() as f64;
        let adequate_length = segments
            .iter()
            .filter(|s| s.text.chars().count() >= self.params.phrase_min_segment_chars)
            .count() as f64;

        let context_dependency = (connective_openers / total).clamp(0.0, 1.0);
        let standalone_clarity =
            ((1.0 - context_dependency) * (adequate_length / total)).clamp(0.0, 1.0);

        (context_dependency, standalone_clarity)
    }
}

/// Split text into trimmed sentence-like segments with character offsets
///
/// Delimiters themselves are not part of a segment. Offsets are character
/// (not byte) positions into the original text, matching the storage
/// contract's `start_char`/`end_char` fields.
fn segment_text(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut segment_start = 0usize;

    for (char_idx, ch) in text.chars().enumerate() {
        if SEGMENT_DELIMITERS.contains(&ch) {
            push_segment(&mut segments, &current, segment_start);
            current.clear();
            segment_start = char_idx + 1;
        } else {
            current.push(ch);
        }
    }
    push_segment(&mut segments, &current, segment_start);

    segments
}

/// Trim a raw segment and record its trimmed character offsets
fn push_segment(segments: &mut Vec<Segment>, raw: &str, raw_start: usize) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading_ws = raw.chars().take_while(|c| c.is_whitespace()).count();
    let start_char = raw_start + leading_ws;
    let end_char = start_char + trimmed.chars().count();
    segments.push(Segment {
        text: trimmed.to_string(),
        start_char,
        end_char,
    });
}

/// True when the segment's first word is a discourse connective
fn opens_with_connective(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .map(|first| {
            let lowered: String = first
                .to_lowercase()
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect();
            CONNECTIVE_OPENERS.contains(&lowered.as_str())
        })
        .unwrap_or(false)
}
