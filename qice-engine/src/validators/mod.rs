//! Tier 3 validation: citations against ground truth
//!
//! Two validators implement the `Validation` trait:
//! - `CitationValidator` - per-citation checks (quote fidelity, relevance
//!   floor, semantic alignment)
//! - `InterviewValidator` - per-interview citation coverage and quality
//!
//! Results accumulate in a `ValidationSession`, which produces the
//! session-level `ValidationReport`.

pub mod citation_validator;
pub mod interview_validator;
pub mod quote_matcher;
pub mod report;

pub use citation_validator::CitationValidator;
pub use interview_validator::{InterviewValidationInput, InterviewValidator};
pub use report::{ValidationReport, ValidationSession};
