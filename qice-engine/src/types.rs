//! Core types and trait definitions for the QICE engine
//!
//! The engine runs in tiers:
//! - **Tier 1:** extraction (tags, phrases) - pure, per-turn
//! - **Tier 2:** citation construction - per-insight
//! - **Tier 3:** validation - per-citation and per-interview
//!
//! # Error Handling
//! Evidentiary problems (missing turn references, quote mismatches, weak
//! relevance or alignment, uncited insights) are soft: they degrade scores
//! and land in issue lists, never abort processing. The error enums below
//! cover the genuinely exceptional paths only.

use qice_common::citation::TurnCitation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Semantic tag drawn from the fixed taxonomy
///
/// Always a member of a set attached to a turn or an insight, never an
/// independent entity.
pub type SemanticTag = String;

// ============================================================================
// Tier 3: Validation Trait
// ============================================================================

/// Validation trait
///
/// All validators implement this trait for uniform execution and reporting.
/// Each validator produces a [`ValidationResult`] with a status, a score, a
/// list of human-readable issues, and a JSON detail report.
///
/// # Validators
/// 1. `CitationValidator` - per-citation ground-truth checks (quote fidelity,
///    relevance floor, semantic alignment)
/// 2. `InterviewValidator` - per-interview citation coverage and quality
#[async_trait::async_trait]
pub trait Validation: Send + Sync {
    /// Input type for validation
    type Input;

    /// Validator name for report provenance
    fn name(&self) -> &'static str;

    /// Validate input and produce a quality assessment
    ///
    /// # Errors
    /// Returns `ValidationError` only on genuinely invalid inputs; evidentiary
    /// problems are reported inside the `ValidationResult` instead.
    async fn validate(&self, input: &Self::Input) -> Result<ValidationResult, ValidationError>;
}

/// Validation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Validation status
    pub status: ValidationStatus,
    /// Quality score (0.0-1.0)
    pub score: f64,
    /// Human-readable issues (fixed template vocabulary, see validators)
    pub issues: Vec<String>,
    /// Detailed validation report (JSON)
    pub report: serde_json::Value,
}

impl ValidationResult {
    /// True iff no issues were raised
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// All checks passed
    Pass,
    /// Minor issues detected (advisory)
    Warning,
    /// Serious issues detected (review recommended)
    Fail,
    /// Validation not yet performed
    Pending,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationStatus::Pass => write!(f, "Pass"),
            ValidationStatus::Warning => write!(f, "Warning"),
            ValidationStatus::Fail => write!(f, "Fail"),
            ValidationStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// Input bundle for per-citation validation
///
/// Carries the ground truth the checks run against: the literal turn text
/// and the insight's own text/tags.
#[derive(Debug, Clone)]
pub struct CitationCheckInput {
    /// The citation under validation
    pub citation: TurnCitation,
    /// Literal text of the cited turn
    pub turn_text: String,
    /// The insight's content text (may be empty)
    pub insight_text: String,
    /// The insight's own semantic tags
    pub insight_tags: BTreeSet<SemanticTag>,
    /// The cited turn's semantic tags
    pub turn_tags: BTreeSet<SemanticTag>,
}

// ============================================================================
// Per-Tier Errors
// ============================================================================

// Extraction (Tier 1) and construction (Tier 2) are total over structurally
// valid input: unknown annotation values contribute nothing and bad turn
// references are recorded, not raised. Only validation and aggregation have
// genuinely exceptional paths.

/// Validation error (Tier 3)
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Corpus aggregation error
#[derive(Debug, Error)]
pub enum AggregationError {
    /// Aggregation invoked over an empty corpus snapshot
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// Chain resolution failed an exact id join
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result_is_valid_iff_no_issues() {
        let clean = ValidationResult {
            status: ValidationStatus::Pass,
            score: 0.9,
            issues: vec![],
            report: serde_json::json!({}),
        };
        assert!(clean.is_valid());

        let flagged = ValidationResult {
            status: ValidationStatus::Warning,
            score: 0.6,
            issues: vec!["low relevance score 0.25 for turn 3".to_string()],
            report: serde_json::json!({}),
        };
        assert!(!flagged.is_valid());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ValidationStatus::Pass.to_string(), "Pass");
        assert_eq!(ValidationStatus::Pending.to_string(), "Pending");
    }
}
