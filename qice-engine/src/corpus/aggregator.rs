//! Corpus Aggregator
//!
//! Finds cross-interview patterns in the theme index and expresses each as a
//! `CorpusInsight` with prevalence and confidence statistics.
//!
//! # Confidence
//! `confidence = min(0.9, prevalence x 2)` - a deliberately simple, monotone,
//! saturating policy function inherited from the original system, not a
//! statistically derived estimator. The slope and cap are `ScoringParams`
//! fields.

use crate::corpus::theme_index::{ThemeIndex, ThemeOccurrence};
use qice_common::citation::InterviewCitation;
use qice_common::params::ScoringParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// A cross-interview pattern with its supporting interviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusInsight {
    /// Corpus insight identifier (derived from type and normalized theme)
    pub insight_id: String,
    /// Insight category the pattern aggregates over
    pub insight_type: String,
    /// Normalized theme key the pattern groups on
    pub theme: String,
    /// Pattern content description
    pub content: String,
    /// One citation per contributing insight occurrence
    pub supporting_interviews: Vec<InterviewCitation>,
    /// Distinct supporting interviews / total interviews in the snapshot
    pub prevalence: f64,
    /// Saturating confidence (see module docs)
    pub confidence: f64,
}

/// Corpus Aggregator
pub struct CorpusAggregator {
    params: ScoringParams,
}

impl CorpusAggregator {
    /// Create an aggregator with the given scoring parameters
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Cross-interview priorities at or above the prevalence threshold
    pub fn find_common_priorities(&self, index: &ThemeIndex, min_prevalence: f64) -> Vec<CorpusInsight> {
        self.find_common_patterns(index, "priority", min_prevalence)
    }

    /// Cross-interview patterns of one insight category at or above the
    /// prevalence threshold
    ///
    /// Prevalence is recomputed from the index's snapshot on every call;
    /// nothing here caches a stale interview count.
    pub fn find_common_patterns(
        &self,
        index: &ThemeIndex,
        insight_type: &str,
        min_prevalence: f64,
    ) -> Vec<CorpusInsight> {
        let total = index.total_interviews();
        if total == 0 {
            return Vec::new();
        }

        let mut patterns = Vec::new();
        for ((entry_type, theme), occurrences) in index.entries() {
            if entry_type != insight_type {
                continue;
            }

            let distinct = ThemeIndex::distinct_interviews(occurrences);
            let prevalence = distinct as f64 / total as f64;
            if prevalence < min_prevalence {
                debug!(
                    theme = %theme,
                    prevalence,
                    min_prevalence,
                    "Theme below prevalence threshold"
                );
                continue;
            }

            patterns.push(self.build_insight(insight_type, theme, occurrences, prevalence, distinct, total));
        }

        info!(
            insight_type,
            pattern_count = patterns.len(),
            total_interviews = total,
            "Corpus pattern aggregation complete"
        );

        patterns
    }

    fn build_insight(
        &self,
        insight_type: &str,
        theme: &str,
        occurrences: &[ThemeOccurrence],
        prevalence: f64,
        distinct: usize,
        total: usize,
    ) -> CorpusInsight {
        let supporting_interviews: Vec<InterviewCitation> = occurrences
            .iter()
            .map(|o| InterviewCitation {
                interview_id: o.interview_id.clone(),
                insight_id: o.insight_id.clone(),
                relevance: o.intensity,
            })
            .collect();

        let confidence = (prevalence * self.params.corpus_confidence_slope)
            .min(self.params.corpus_confidence_cap);

        CorpusInsight {
            insight_id: format!("corpus_{}_{}", insight_type, theme.replace(' ', "_")),
            insight_type: insight_type.to_string(),
            theme: theme.to_string(),
            content: format!(
                "{} of {} interviews raise '{}' as a {}",
                distinct, total, theme, insight_type
            ),
            supporting_interviews,
            prevalence,
            confidence,
        }
    }

    /// Distinct interview ids supporting a corpus insight
    pub fn supporting_interview_ids(insight: &CorpusInsight) -> Vec<String> {
        let mut seen = BTreeSet::new();
        insight
            .supporting_interviews
            .iter()
            .filter(|c| seen.insert(c.interview_id.clone()))
            .map(|c| c.interview_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{InsightSummary, InterviewCitationSet};
    use std::collections::HashMap;

    fn interview(id: &str, themes: Vec<(&str, f64)>) -> InterviewCitationSet {
        InterviewCitationSet {
            interview_id: id.to_string(),
            insights: themes
                .into_iter()
                .enumerate()
                .map(|(i, (theme, intensity))| InsightSummary {
                    insight_id: format!("priority_{}", i),
                    insight_type: "priority".to_string(),
                    theme: theme.to_string(),
                    intensity,
                    primary_turn_ids: vec![1],
                })
                .collect(),
            turn_texts: HashMap::new(),
        }
    }

    fn corpus_with_theme_in(n_with: usize, n_total: usize) -> Vec<InterviewCitationSet> {
        (0..n_total)
            .map(|i| {
                if i < n_with {
                    interview(&format!("int_{:03}", i), vec![("seguridad", 0.8)])
                } else {
                    interview(&format!("int_{:03}", i), vec![("vivienda", 0.5)])
                }
            })
            .collect()
    }

    #[test]
    fn test_prevalence_is_count_over_total() {
        // 27 of 37 interviews raise security
        let interviews = corpus_with_theme_in(27, 37);
        let index = ThemeIndex::build(&interviews);
        let aggregator = CorpusAggregator::new(ScoringParams::default());

        let patterns = aggregator.find_common_priorities(&index, 0.5);
        let security = patterns.iter().find(|p| p.theme == "seguridad").unwrap();
        assert!((security.prevalence - 27.0 / 37.0).abs() < 1e-9);
        assert_eq!(security.supporting_interviews.len(), 27);
    }

    #[test]
    fn test_confidence_saturates_at_cap() {
        let interviews = corpus_with_theme_in(27, 37);
        let index = ThemeIndex::build(&interviews);
        let aggregator = CorpusAggregator::new(ScoringParams::default());

        let patterns = aggregator.find_common_priorities(&index, 0.5);
        let security = patterns.iter().find(|p| p.theme == "seguridad").unwrap();
        // min(0.9, 0.7297 * 2) = 0.9
        assert_eq!(security.confidence, 0.9);
    }

    #[test]
    fn test_confidence_monotone_below_cap() {
        let aggregator = CorpusAggregator::new(ScoringParams::default());
        let mut last = 0.0;
        for n_with in 1..=4usize {
            let interviews = corpus_with_theme_in(n_with, 10);
            let index = ThemeIndex::build(&interviews);
            let patterns = aggregator.find_common_priorities(&index, 0.0);
            let security = patterns.iter().find(|p| p.theme == "seguridad").unwrap();
            assert!(security.confidence >= last);
            assert!(security.confidence <= 0.9);
            last = security.confidence;
        }
    }

    #[test]
    fn test_below_threshold_themes_excluded() {
        let interviews = corpus_with_theme_in(2, 10);
        let index = ThemeIndex::build(&interviews);
        let aggregator = CorpusAggregator::new(ScoringParams::default());

        let patterns = aggregator.find_common_priorities(&index, 0.3);
        assert!(patterns.iter().all(|p| p.theme != "seguridad"));
        // vivienda appears in 8/10
        assert!(patterns.iter().any(|p| p.theme == "vivienda"));
    }

    #[test]
    fn test_interview_citation_carries_insight_intensity() {
        let interviews = vec![
            interview("a", vec![("seguridad", 0.9)]),
            interview("b", vec![("seguridad", 0.4)]),
        ];
        let index = ThemeIndex::build(&interviews);
        let aggregator = CorpusAggregator::new(ScoringParams::default());

        let patterns = aggregator.find_common_priorities(&index, 0.5);
        let security = &patterns[0];
        let relevances: Vec<f64> = security
            .supporting_interviews
            .iter()
            .map(|c| c.relevance)
            .collect();
        assert!(relevances.contains(&0.9));
        assert!(relevances.contains(&0.4));
    }

    #[test]
    fn test_empty_corpus_yields_no_patterns() {
        let index = ThemeIndex::build(&[]);
        let aggregator = CorpusAggregator::new(ScoringParams::default());
        assert!(aggregator.find_common_priorities(&index, 0.0).is_empty());
    }
}
