//! Session-level validation reporting
//!
//! A `ValidationSession` accumulates every citation check and coverage issue
//! raised during one analysis run, then produces the `ValidationReport` that
//! always accompanies citation output. Consumers treat the report as a
//! quality signal, never as silent data loss - flagged citations remain in
//! the citation sets.
//!
//! Issues are bucketed by matching against the validators' fixed template
//! vocabulary. String matching is acceptable here because every issue string
//! is generated from a small set of known templates.

use crate::types::ValidationResult;
use serde::{Deserialize, Serialize};

/// Accumulates validation outcomes across one analysis run
#[derive(Debug, Clone, Default)]
pub struct ValidationSession {
    citations_checked: usize,
    citations_valid: usize,
    issues: Vec<String>,
}

impl ValidationSession {
    /// Start an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one per-citation validation outcome
    pub fn record_citation(&mut self, result: &ValidationResult) {
        self.citations_checked += 1;
        if result.is_valid() {
            self.citations_valid += 1;
        }
        self.issues.extend(result.issues.iter().cloned());
    }

    /// Record interview-level issues (uncited insights, missing references)
    pub fn record_issues<I>(&mut self, issues: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.issues.extend(issues);
    }

    /// Citations checked so far
    pub fn citations_checked(&self) -> usize {
        self.citations_checked
    }

    /// Fold another session into this one (used at the fan-in barrier to
    /// combine per-interview sessions)
    pub fn merge(&mut self, other: ValidationSession) {
        self.citations_checked += other.citations_checked;
        self.citations_valid += other.citations_valid;
        self.issues.extend(other.issues);
    }

    /// Produce the session report
    pub fn generate_validation_report(&self) -> ValidationReport {
        let mut report = ValidationReport {
            generated_at: chrono::Utc::now(),
            citations_checked: self.citations_checked,
            citations_valid: self.citations_valid,
            validity_rate: if self.citations_checked == 0 {
                0.0
            } else {
                self.citations_valid as f64 / self.citations_checked as f64
            },
            missing_quotes: vec![],
            low_relevance: vec![],
            semantic_mismatch: vec![],
            missing_citations: vec![],
        };

        for issue in &self.issues {
            if issue.contains("quote not found") {
                report.missing_quotes.push(issue.clone());
            } else if issue.contains("low relevance") {
                report.low_relevance.push(issue.clone());
            } else if issue.contains("semantic") {
                report.semantic_mismatch.push(issue.clone());
            } else if issue.contains("no citations") || issue.contains("missing turn") {
                report.missing_citations.push(issue.clone());
            }
        }

        report
    }
}

/// Session validation summary for consumers of citation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// When the report was generated
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Citations checked in the session
    pub citations_checked: usize,
    /// Citations that raised no issues
    pub citations_valid: usize,
    /// valid / checked (0.0 when nothing was checked)
    pub validity_rate: f64,
    /// Quote fidelity failures
    pub missing_quotes: Vec<String>,
    /// Relevance floor failures
    pub low_relevance: Vec<String>,
    /// Weak semantic alignment warnings
    pub semantic_mismatch: Vec<String>,
    /// Uncited insights and unresolvable turn references
    pub missing_citations: Vec<String>,
}

impl ValidationReport {
    /// Total bucketed issues
    pub fn issue_count(&self) -> usize {
        self.missing_quotes.len()
            + self.low_relevance.len()
            + self.semantic_mismatch.len()
            + self.missing_citations.len()
    }
}
