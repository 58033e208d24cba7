//! Semantic tag taxonomy
//!
//! Maps the four upstream annotation axes (functional role, topics, emotions,
//! evidence type) into a closed set of semantic tags via fixed lookup tables.
//! The tables are heuristic mappings inherited from the original analysis
//! system; unknown axis values simply contribute no tags.
//!
//! Tags fall into four categories:
//! - `*_concern` - what the speaker is worried about (from topics/themes)
//! - `*_expression` - how the speaker feels (from emotions)
//! - `*_evidence` / `*_reference` / `*_statement` - what the claim stands on
//! - `solution_proposal` / related - constructive framing (from function)
//!
//! Interview corpora in this domain are frequently Spanish-language, so the
//! topic and emotion tables carry both Spanish and English annotator labels.

use crate::types::SemanticTag;
use std::collections::{BTreeSet, HashMap};

/// Fixed lookup tables from annotation axis values to semantic tags
///
/// Build once per analysis run and share by reference; lookups are pure.
pub struct TagTaxonomy {
    /// Functional role -> tag
    function_tags: HashMap<String, SemanticTag>,
    /// Topic label -> tag
    topic_tags: HashMap<String, SemanticTag>,
    /// Emotion label -> tag
    emotion_tags: HashMap<String, SemanticTag>,
    /// Evidence type -> tag
    evidence_tags: HashMap<String, SemanticTag>,
}

impl TagTaxonomy {
    /// Create the taxonomy with the inherited mapping tables
    pub fn new() -> Self {
        Self {
            function_tags: Self::build_function_table(),
            topic_tags: Self::build_topic_table(),
            emotion_tags: Self::build_emotion_table(),
            evidence_tags: Self::build_evidence_table(),
        }
    }

    fn build_function_table() -> HashMap<String, SemanticTag> {
        let mut t = HashMap::new();
        t.insert("problem_identification".into(), "concern_statement".into());
        t.insert("complaint".into(), "grievance_expression".into());
        t.insert("solution_proposal".into(), "solution_proposal".into());
        t.insert("proposal".into(), "solution_proposal".into());
        t.insert("request".into(), "assistance_request".into());
        t.insert("narrative".into(), "experience_account".into());
        t.insert("storytelling".into(), "experience_account".into());
        t.insert("evaluation".into(), "assessment_statement".into());
        t
    }

    fn build_topic_table() -> HashMap<String, SemanticTag> {
        let mut t = HashMap::new();
        // Security / crime
        for key in ["security", "seguridad", "crime", "delincuencia", "robos", "violence", "violencia"] {
            t.insert(key.into(), "security_concern".into());
        }
        // Infrastructure
        for key in ["infrastructure", "infraestructura", "roads", "calles", "lighting", "alumbrado"] {
            t.insert(key.into(), "infrastructure_concern".into());
        }
        // Health
        for key in ["health", "salud", "hospital", "clinic"] {
            t.insert(key.into(), "health_concern".into());
        }
        // Education
        for key in ["education", "educacion", "schools", "escuelas"] {
            t.insert(key.into(), "education_concern".into());
        }
        // Employment
        for key in ["employment", "empleo", "work", "trabajo", "jobs"] {
            t.insert(key.into(), "employment_concern".into());
        }
        // Housing
        for key in ["housing", "vivienda"] {
            t.insert(key.into(), "housing_concern".into());
        }
        // Water / sanitation
        for key in ["water", "agua", "sanitation", "saneamiento", "drainage", "drenaje"] {
            t.insert(key.into(), "sanitation_concern".into());
        }
        // Transport
        for key in ["transport", "transporte", "transit"] {
            t.insert(key.into(), "transport_concern".into());
        }
        // Environment
        for key in ["environment", "medio ambiente", "pollution", "contaminacion"] {
            t.insert(key.into(), "environment_concern".into());
        }
        // Governance
        for key in ["government", "gobierno", "corruption", "corrupcion", "authorities", "autoridades"] {
            t.insert(key.into(), "governance_concern".into());
        }
        t
    }

    fn build_emotion_table() -> HashMap<String, SemanticTag> {
        let mut t = HashMap::new();
        for key in ["fear", "miedo", "anxiety", "ansiedad", "worry", "preocupacion"] {
            t.insert(key.into(), "fear_expression".into());
        }
        for key in ["anger", "enojo", "rabia"] {
            t.insert(key.into(), "anger_expression".into());
        }
        for key in ["frustration", "frustracion"] {
            t.insert(key.into(), "frustration_expression".into());
        }
        for key in ["sadness", "tristeza", "grief"] {
            t.insert(key.into(), "distress_expression".into());
        }
        for key in ["hope", "esperanza", "optimism"] {
            t.insert(key.into(), "hope_expression".into());
        }
        for key in ["pride", "orgullo"] {
            t.insert(key.into(), "pride_expression".into());
        }
        for key in ["resignation", "resignacion"] {
            t.insert(key.into(), "resignation_expression".into());
        }
        t
    }

    fn build_evidence_table() -> HashMap<String, SemanticTag> {
        let mut t = HashMap::new();
        t.insert("personal_experience".into(), "experiential_evidence".into());
        t.insert("witnessed".into(), "observational_evidence".into());
        t.insert("observation".into(), "observational_evidence".into());
        t.insert("hearsay".into(), "secondhand_evidence".into());
        t.insert("secondhand".into(), "secondhand_evidence".into());
        t.insert("statistic".into(), "factual_reference".into());
        t.insert("factual".into(), "factual_reference".into());
        t.insert("opinion".into(), "opinion_statement".into());
        t
    }

    /// Normalize an axis value for table lookup
    fn normalize(value: &str) -> String {
        value.trim().to_lowercase()
    }

    /// Tag for a functional role, if the role is known
    pub fn function_tag(&self, role: &str) -> Option<&SemanticTag> {
        self.function_tags.get(&Self::normalize(role))
    }

    /// Tag for a topic label, if the topic is known
    pub fn topic_tag(&self, topic: &str) -> Option<&SemanticTag> {
        self.topic_tags.get(&Self::normalize(topic))
    }

    /// Tag for an emotion label, if the emotion is known
    pub fn emotion_tag(&self, emotion: &str) -> Option<&SemanticTag> {
        self.emotion_tags.get(&Self::normalize(emotion))
    }

    /// Tag for an evidence type, if the type is known
    pub fn evidence_tag(&self, evidence_type: &str) -> Option<&SemanticTag> {
        self.evidence_tags.get(&Self::normalize(evidence_type))
    }

    /// Tags for an insight theme
    ///
    /// Tries the whole normalized theme first, then individual words, so
    /// "Seguridad en el barrio" still lands on `security_concern`.
    pub fn theme_tags(&self, theme: &str) -> BTreeSet<SemanticTag> {
        let mut tags = BTreeSet::new();
        let normalized = Self::normalize(theme);

        if let Some(tag) = self.topic_tags.get(&normalized) {
            tags.insert(tag.clone());
        }
        for word in normalized.split_whitespace() {
            if let Some(tag) = self.topic_tags.get(word) {
                tags.insert(tag.clone());
            }
        }
        tags
    }
}

impl Default for TagTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_lookup_bilingual() {
        let taxonomy = TagTaxonomy::new();
        assert_eq!(
            taxonomy.topic_tag("security").map(String::as_str),
            Some("security_concern")
        );
        assert_eq!(
            taxonomy.topic_tag("Seguridad").map(String::as_str),
            Some("security_concern")
        );
    }

    #[test]
    fn test_unknown_values_contribute_nothing() {
        let taxonomy = TagTaxonomy::new();
        assert!(taxonomy.topic_tag("quantum chromodynamics").is_none());
        assert!(taxonomy.emotion_tag("").is_none());
        assert!(taxonomy.function_tag("interpretive dance").is_none());
    }

    #[test]
    fn test_theme_tags_match_multiword_themes() {
        let taxonomy = TagTaxonomy::new();
        let tags = taxonomy.theme_tags("Seguridad en el barrio");
        assert!(tags.contains("security_concern"));
    }

    #[test]
    fn test_evidence_lookup() {
        let taxonomy = TagTaxonomy::new();
        assert_eq!(
            taxonomy.evidence_tag("personal_experience").map(String::as_str),
            Some("experiential_evidence")
        );
    }
}
