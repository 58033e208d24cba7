//! Scoring parameter set
//!
//! Every weight, bonus, and threshold the engine applies is a named field
//! here. The values are policy choices inherited from the original analysis
//! system, not statistically derived estimators - treat them as tunable
//! knobs that keep a reimplementation behaviorally comparable, not as
//! load-bearing algorithmic truths.
//!
//! Parameters are an explicit value threaded into builders and validators.
//! There is deliberately no global singleton: each analysis run constructs
//! (or loads) its own `ScoringParams` and passes it down.

use serde::{Deserialize, Serialize};

/// Tunable scoring parameters for one analysis run
///
/// `Default` yields the inherited policy values; any subset can be overridden
/// from a TOML file via [`crate::config::load_params`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Base relevance for any accepted citation
    ///
    /// Default: 0.5
    pub relevance_base: f64,

    /// Weight of the insight/turn tag-overlap ratio in relevance
    ///
    /// Default: 0.3
    pub relevance_tag_overlap_weight: f64,

    /// Relevance bonus when the quoted text is a literal substring of the turn
    ///
    /// Default: 0.2
    pub relevance_quote_bonus: f64,

    /// Relevance floor below which validation raises a low-relevance issue
    ///
    /// Default: 0.3
    pub relevance_floor: f64,

    /// Base importance for a key-phrase segment
    ///
    /// Default: 0.5
    pub phrase_base_importance: f64,

    /// Weight of the turn's emotional intensity in phrase importance
    ///
    /// Default: 0.2
    pub phrase_intensity_weight: f64,

    /// Importance bonus when a segment contains a topic keyword
    ///
    /// Default: 0.2
    pub phrase_topic_bonus: f64,

    /// Importance bonus when the turn's evidence type is personal experience
    ///
    /// Default: 0.1
    pub phrase_experience_bonus: f64,

    /// Minimum segment length considered a phrase (chars)
    ///
    /// Default: 20
    pub phrase_min_segment_chars: usize,

    /// How many top-ranked phrases to retain per turn
    ///
    /// Default: 5
    pub phrase_top_n: usize,

    /// Maximum segment length still considered quotable (chars)
    ///
    /// Default: 240
    pub quotable_max_segment_chars: usize,

    /// Minimum normalized similarity for a fuzzy quote match to be accepted
    ///
    /// Default: 0.8
    pub fuzzy_accept_threshold: f64,

    /// Confidence cap for an insight with zero primary citations (hard rule)
    ///
    /// Default: 0.3
    pub uncited_confidence_cap: f64,

    /// Weight of mean primary-citation relevance in insight confidence
    ///
    /// Default: 0.6
    pub confidence_primary_relevance_weight: f64,

    /// Weight of the (capped) primary-citation count in insight confidence
    ///
    /// Default: 0.2
    pub confidence_primary_count_weight: f64,

    /// Weight of the (capped) supporting-citation count in insight confidence
    ///
    /// Default: 0.2
    pub confidence_supporting_count_weight: f64,

    /// Base quality score for an insight that carries citations
    ///
    /// Default: 0.5
    pub quality_base: f64,

    /// Quality bonus for having at least one primary citation
    ///
    /// Default: 0.2
    pub quality_primary_bonus: f64,

    /// Quality score returned immediately when no primary citation exists
    /// (primary evidence is a hard gate, not merely additive)
    ///
    /// Default: 0.3
    pub quality_no_primary_score: f64,

    /// Quality bonus per distinct cited turn beyond the first
    ///
    /// Default: 0.05
    pub quality_diversity_step: f64,

    /// Cap on the citation-diversity bonus
    ///
    /// Default: 0.2
    pub quality_diversity_cap: f64,

    /// Max quality bonus for spread of cited turns across the turn range
    ///
    /// Default: 0.1
    pub quality_spread_weight: f64,

    /// Cap on corpus-insight confidence
    ///
    /// Default: 0.9
    pub corpus_confidence_cap: f64,

    /// Slope of the corpus confidence function (confidence = slope x prevalence,
    /// saturating at the cap) - a deliberately simple monotone policy
    ///
    /// Default: 2.0
    pub corpus_confidence_slope: f64,

    /// Default prevalence threshold for corpus patterns
    ///
    /// Default: 0.3
    pub corpus_min_prevalence: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            relevance_base: 0.5,
            relevance_tag_overlap_weight: 0.3,
            relevance_quote_bonus: 0.2,
            relevance_floor: 0.3,
            phrase_base_importance: 0.5,
            phrase_intensity_weight: 0.2,
            phrase_topic_bonus: 0.2,
            phrase_experience_bonus: 0.1,
            phrase_min_segment_chars: 20,
            phrase_top_n: 5,
            quotable_max_segment_chars: 240,
            fuzzy_accept_threshold: 0.8,
            uncited_confidence_cap: 0.3,
            confidence_primary_relevance_weight: 0.6,
            confidence_primary_count_weight: 0.2,
            confidence_supporting_count_weight: 0.2,
            quality_base: 0.5,
            quality_primary_bonus: 0.2,
            quality_no_primary_score: 0.3,
            quality_diversity_step: 0.05,
            quality_diversity_cap: 0.2,
            quality_spread_weight: 0.1,
            corpus_confidence_cap: 0.9,
            corpus_confidence_slope: 2.0,
            corpus_min_prevalence: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_inherited_policy() {
        let p = ScoringParams::default();
        assert_eq!(p.relevance_base, 0.5);
        assert_eq!(p.relevance_tag_overlap_weight, 0.3);
        assert_eq!(p.relevance_quote_bonus, 0.2);
        assert_eq!(p.fuzzy_accept_threshold, 0.8);
        assert_eq!(p.uncited_confidence_cap, 0.3);
        assert_eq!(p.corpus_confidence_cap, 0.9);
        assert_eq!(p.corpus_confidence_slope, 2.0);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_src = r#"
            fuzzy_accept_threshold = 0.9
            phrase_top_n = 3
        "#;
        let p: ScoringParams = toml::from_str(toml_src).unwrap();
        assert_eq!(p.fuzzy_accept_threshold, 0.9);
        assert_eq!(p.phrase_top_n, 3);
        // Untouched fields fall back to policy defaults
        assert_eq!(p.relevance_base, 0.5);
    }
}
