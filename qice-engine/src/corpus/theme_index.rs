//! Theme index
//!
//! Groups insight occurrences across interviews by (insight type, normalized
//! theme). Built once per analysis run from the finished interview set;
//! prevalence is always computed against the snapshot's interview count,
//! never cached across runs.

use crate::corpus::InterviewCitationSet;
use std::collections::{BTreeMap, BTreeSet};

/// Normalize a theme for exact-key grouping
///
/// Unicode-lowercase, trim, collapse internal whitespace, strip trailing
/// punctuation. Grouping stays an exact match on the normalized key - theme
/// synonymy is the annotator's job, not this index's.
pub fn normalize_theme(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string()
}

/// One insight occurrence under a theme key
#[derive(Debug, Clone)]
pub struct ThemeOccurrence {
    /// Interview the insight came from
    pub interview_id: String,
    /// Insight id within that interview
    pub insight_id: String,
    /// Theme as originally stated (pre-normalization), for display
    pub theme_display: String,
    /// The insight's emotional intensity
    pub intensity: f64,
}

/// Index of insight occurrences keyed by (insight type, normalized theme)
#[derive(Debug, Clone)]
pub struct ThemeIndex {
    entries: BTreeMap<(String, String), Vec<ThemeOccurrence>>,
    total_interviews: usize,
}

impl ThemeIndex {
    /// Build the index over one run's finished interviews
    pub fn build(interviews: &[InterviewCitationSet]) -> Self {
        let mut entries: BTreeMap<(String, String), Vec<ThemeOccurrence>> = BTreeMap::new();

        for interview in interviews {
            for insight in &interview.insights {
                let key = (
                    insight.insight_type.clone(),
                    normalize_theme(&insight.theme),
                );
                entries.entry(key).or_default().push(ThemeOccurrence {
                    interview_id: interview.interview_id.clone(),
                    insight_id: insight.insight_id.clone(),
                    theme_display: insight.theme.clone(),
                    intensity: insight.intensity,
                });
            }
        }

        Self {
            entries,
            total_interviews: interviews.len(),
        }
    }

    /// Interview count of the snapshot this index was built from
    pub fn total_interviews(&self) -> usize {
        self.total_interviews
    }

    /// Iterate (insight_type, normalized_theme) entries
    pub fn entries(&self) -> impl Iterator<Item = (&(String, String), &Vec<ThemeOccurrence>)> {
        self.entries.iter()
    }

    /// Distinct interviews contributing to a key
    pub fn distinct_interviews(occurrences: &[ThemeOccurrence]) -> usize {
        occurrences
            .iter()
            .map(|o| o.interview_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::InsightSummary;
    use std::collections::HashMap;

    fn interview(id: &str, themes: Vec<&str>) -> InterviewCitationSet {
        InterviewCitationSet {
            interview_id: id.to_string(),
            insights: themes
                .into_iter()
                .enumerate()
                .map(|(i, theme)| InsightSummary {
                    insight_id: format!("priority_{}", i),
                    insight_type: "priority".to_string(),
                    theme: theme.to_string(),
                    intensity: 0.7,
                    primary_turn_ids: vec![1],
                })
                .collect(),
            turn_texts: HashMap::new(),
        }
    }

    #[test]
    fn test_normalize_theme() {
        assert_eq!(normalize_theme("  Seguridad  "), "seguridad");
        assert_eq!(normalize_theme("La   Seguridad."), "la seguridad");
        assert_eq!(normalize_theme("seguridad!!"), "seguridad");
    }

    #[test]
    fn test_theme_variants_group_under_one_key() {
        let index = ThemeIndex::build(&[
            interview("a", vec!["Seguridad"]),
            interview("b", vec!["seguridad "]),
            interview("c", vec!["vivienda"]),
        ]);

        let security = index
            .entries()
            .find(|(key, _)| key.1 == "seguridad")
            .expect("security entry");
        assert_eq!(security.1.len(), 2);
        assert_eq!(index.total_interviews(), 3);
    }

    #[test]
    fn test_distinct_interviews_dedupes_repeat_mentions() {
        // One interview stating the same theme twice counts once
        let index = ThemeIndex::build(&[interview("a", vec!["seguridad", "Seguridad"])]);
        let (_, occurrences) = index.entries().next().unwrap();
        assert_eq!(occurrences.len(), 2);
        assert_eq!(ThemeIndex::distinct_interviews(occurrences), 1);
    }
}
