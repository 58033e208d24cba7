//! Interview Validator (Tier 3)
//!
//! Assesses one interview's citation coverage across its insight categories
//! and scores the quality of every cited insight.
//!
//! # Quality Scoring
//! Per insight that carries citations:
//! - No primary citation: return 0.3 immediately - primary evidence is a
//!   hard gate, not merely additive
//! - Otherwise start at 0.5, add 0.2 for primary evidence
//! - + up to 0.2 for citation diversity (distinct cited turns, capped)
//! - + up to 0.1 for spread of cited turns across the interview's turn range
//!   (citing one clustered moment earns less than evidence drawn from across
//!   the conversation)
//!
//! Insights with zero citations are recorded as issues, never silently
//! skipped.

use crate::citation::TurnSet;
use crate::types::{Validation, ValidationError, ValidationResult, ValidationStatus};
use async_trait::async_trait;
use qice_common::citation::InsightCitation;
use qice_common::params::ScoringParams;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Input bundle for interview-level validation
#[derive(Debug, Clone)]
pub struct InterviewValidationInput {
    /// Interview identifier (report provenance only)
    pub interview_id: String,
    /// All insight citations constructed for the interview
    pub insights: Vec<InsightCitation>,
    /// The interview's known turn set (for the spread component)
    pub turns: TurnSet,
}

/// Per-category coverage counts
#[derive(Debug, Clone, Default)]
struct CategoryCoverage {
    cited: usize,
    uncited: usize,
}

/// Interview Validator
pub struct InterviewValidator {
    params: ScoringParams,
}

impl InterviewValidator {
    /// Create a validator with the given scoring parameters
    pub fn new(params: ScoringParams) -> Self {
        Self { params }
    }

    /// Quality score for one cited insight
    pub fn quality_score(&self, insight: &InsightCitation, turns: &TurnSet) -> f64 {
        if insight.primary_citations.is_empty() {
            return self.params.quality_no_primary_score;
        }

        let mut score = self.params.quality_base + self.params.quality_primary_bonus;

        // Diversity: distinct cited turns beyond the first, capped
        let distinct: BTreeSet<u32> = insight
            .primary_citations
            .iter()
            .chain(insight.supporting_citations.iter())
            .map(|c| c.turn_id)
            .collect();
        let diversity = (self.params.quality_diversity_step
            * distinct.len().saturating_sub(1) as f64)
            .min(self.params.quality_diversity_cap);
        score += diversity;

        // Spread: how widely the cited turns cover the interview's turn range
        let positions: Vec<usize> = distinct
            .iter()
            .filter_map(|id| turns.position(*id))
            .collect();
        if positions.len() >= 2 && turns.len() > 1 {
            let min = *positions.iter().min().unwrap_or(&0);
            let max = *positions.iter().max().unwrap_or(&0);
            let spread_ratio = (max - min) as f64 / (turns.len() - 1) as f64;
            score += spread_ratio * self.params.quality_spread_weight;
        }

        score.clamp(0.0, 1.0)
    }

    fn check_interview(&self, input: &InterviewValidationInput) -> ValidationResult {
        let mut coverage: BTreeMap<String, CategoryCoverage> = BTreeMap::new();
        let mut issues = Vec::new();
        let mut quality_scores = Vec::new();
        let mut quality_by_insight = serde_json::Map::new();

        for insight in &input.insights {
            let entry = coverage.entry(insight.insight_type.clone()).or_default();

            if insight.is_uncited() {
                entry.uncited += 1;
                issues.push(format!(
                    "no citations for insight {} ({})",
                    insight.insight_id, insight.insight_type
                ));
                continue;
            }

            entry.cited += 1;
            let quality = self.quality_score(insight, &input.turns);
            quality_by_insight.insert(insight.insight_id.clone(), json!(quality));
            quality_scores.push(quality);
        }

        let mean_quality = if quality_scores.is_empty() {
            0.0
        } else {
            quality_scores.iter().sum::<f64>() / quality_scores.len() as f64
        };

        let status = if input.insights.is_empty() {
            ValidationStatus::Pending
        } else if issues.is_empty() {
            ValidationStatus::Pass
        } else if quality_scores.is_empty() {
            ValidationStatus::Fail
        } else {
            ValidationStatus::Warning
        };

        debug!(
            interview_id = %input.interview_id,
            insight_count = input.insights.len(),
            uncited = issues.len(),
            mean_quality,
            "Interview validation complete"
        );

        let categories: serde_json::Map<String, serde_json::Value> = coverage
            .iter()
            .map(|(category, c)| {
                (
                    category.clone(),
                    json!({ "cited": c.cited, "uncited": c.uncited }),
                )
            })
            .collect();

        let report = json!({
            "validator": "InterviewValidator",
            "interview_id": input.interview_id,
            "categories": categories,
            "quality_by_insight": quality_by_insight,
            "mean_quality": mean_quality,
        });

        ValidationResult {
            status,
            score: mean_quality,
            issues,
            report,
        }
    }
}

#[async_trait]
impl Validation for InterviewValidator {
    type Input = InterviewValidationInput;

    fn name(&self) -> &'static str {
        "InterviewValidator"
    }

    async fn validate(&self, input: &Self::Input) -> Result<ValidationResult, ValidationError> {
        Ok(self.check_interview(input))
    }
}
