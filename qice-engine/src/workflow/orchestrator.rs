//! Analysis pipeline orchestrator
//!
//! Coordinates the full run: per-interview fan-out, fan-in barrier, corpus
//! aggregation, and the session validation report.
//!
//! # Error Handling
//! - Per-interview error isolation: a malformed interview fails alone and is
//!   recorded in `failed_interviews`; processing of the rest continues
//! - Evidentiary issues never fail anything - they accumulate in the
//!   validation session and degrade scores
//! - Only infrastructure failures (a panicked task, an unresolvable citation
//!   chain) abort the run
//!
//! # Example
//! ```rust,ignore
//! let pipeline = AnalysisPipeline::new(PipelineConfig::default());
//! let analysis = pipeline.process_corpus(interviews).await?;
//! println!("{} patterns, validity {:.0}%",
//!     analysis.patterns.len(), analysis.report.validity_rate * 100.0);
//! ```

use super::{CorpusAnalysis, FailedInterview, InterviewAnalysis};
use crate::citation::{CitationBuilder, TurnSet};
use crate::corpus::{to_citation_record, CorpusAggregator, InsightSummary, InterviewCitationSet, ThemeIndex};
use crate::extractors::{extract_turn_metadata, PhraseExtractor, TagExtractor};
use crate::types::{CitationCheckInput, Validation};
use crate::validators::{CitationValidator, InterviewValidationInput, InterviewValidator, ValidationSession};
use anyhow::{Context, Result};
use qice_common::annotation::InterviewAnnotation;
use qice_common::citation::{CitationState, InsightCitation, InterviewInsightCitation};
use qice_common::events::{AnalysisEvent, EventBus};
use qice_common::params::ScoringParams;
use qice_common::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Scoring parameters for the run
    pub params: ScoringParams,
    /// Prevalence threshold override; falls back to
    /// `params.corpus_min_prevalence` when unset
    pub min_prevalence: Option<f64>,
}

/// Analysis pipeline orchestrator
pub struct AnalysisPipeline {
    config: PipelineConfig,
    event_bus: Option<EventBus>,
}

impl AnalysisPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            event_bus: None,
        }
    }

    /// Create a pipeline that reports progress on an event bus
    pub fn with_events(config: PipelineConfig, event_bus: EventBus) -> Self {
        Self {
            config,
            event_bus: Some(event_bus),
        }
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(bus) = &self.event_bus {
            // Nobody listening is fine
            let _ = bus.emit(event);
        }
    }

    /// Run the full analysis over a corpus of annotated interviews
    ///
    /// Interviews are processed concurrently (they share nothing); the corpus
    /// aggregation runs once after every task has joined.
    pub async fn process_corpus(
        &self,
        interviews: Vec<InterviewAnnotation>,
    ) -> Result<CorpusAnalysis> {
        let run_id = Uuid::new_v4();
        info!(%run_id, interview_count = interviews.len(), "Analysis run started");
        self.emit(AnalysisEvent::AnalysisStarted {
            run_id,
            interview_count: interviews.len(),
            timestamp: chrono::Utc::now(),
        });

        // Fan out: one task per interview, no shared mutable state
        let mut handles = Vec::with_capacity(interviews.len());
        for interview in interviews {
            let interview_id = interview.interview_id.clone();
            let params = self.config.params.clone();
            self.emit(AnalysisEvent::InterviewStarted {
                run_id,
                interview_id: interview_id.clone(),
                timestamp: chrono::Utc::now(),
            });
            let handle = tokio::spawn(async move { process_interview(interview, params).await });
            handles.push((interview_id, handle));
        }

        // Fan in: join every task, isolating per-interview failures
        let mut completed = Vec::new();
        let mut failed = Vec::new();
        let mut session = ValidationSession::new();

        for (interview_id, handle) in handles {
            let joined = handle
                .await
                .with_context(|| format!("interview task {} panicked", interview_id))?;
            match joined {
                Ok((analysis, interview_session)) => {
                    let citation_count: usize = analysis
                        .insight_citations
                        .iter()
                        .map(|c| c.primary_turn_ids.len() + c.supporting_turn_ids.len())
                        .sum();
                    let uncited_count = analysis
                        .insight_citations
                        .iter()
                        .filter(|c| c.citation_data.is_uncited())
                        .count();
                    self.emit(AnalysisEvent::InterviewCompleted {
                        run_id,
                        interview_id,
                        insight_count: analysis.insight_citations.len(),
                        citation_count,
                        uncited_count,
                        timestamp: chrono::Utc::now(),
                    });
                    session.merge(interview_session);
                    completed.push(analysis);
                }
                Err(e) => {
                    error!(interview_id = %interview_id, error = %e, "Interview failed input validation");
                    self.emit(AnalysisEvent::InterviewFailed {
                        run_id,
                        interview_id: interview_id.clone(),
                        error: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
                    failed.push(FailedInterview {
                        interview_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        // Aggregation barrier: needs every interview's finished citation data
        self.emit(AnalysisEvent::AggregationStarted {
            run_id,
            interview_count: completed.len(),
            timestamp: chrono::Utc::now(),
        });

        let citation_sets: Vec<InterviewCitationSet> = completed
            .iter()
            .map(|a| a.citation_set.clone())
            .collect();
        let index = ThemeIndex::build(&citation_sets);
        let aggregator = CorpusAggregator::new(self.config.params.clone());
        let min_prevalence = self
            .config
            .min_prevalence
            .unwrap_or(self.config.params.corpus_min_prevalence);
        let patterns = aggregator.find_common_priorities(&index, min_prevalence);

        let pattern_records = patterns
            .iter()
            .map(|p| to_citation_record(p, &citation_sets))
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("citation chain resolution failed")?;

        self.emit(AnalysisEvent::AggregationCompleted {
            run_id,
            pattern_count: patterns.len(),
            timestamp: chrono::Utc::now(),
        });

        let report = session.generate_validation_report();
        info!(
            %run_id,
            completed = completed.len(),
            failed = failed.len(),
            patterns = patterns.len(),
            validity_rate = report.validity_rate,
            "Analysis run complete"
        );
        self.emit(AnalysisEvent::AnalysisCompleted {
            run_id,
            completed: completed.len(),
            failed: failed.len(),
            timestamp: chrono::Utc::now(),
        });

        Ok(CorpusAnalysis {
            run_id,
            interviews: completed,
            failed_interviews: failed,
            patterns,
            pattern_records,
            report,
        })
    }
}

/// Process one interview: extraction → citation construction → validation
///
/// Self-contained per-interview unit of work; depends only on this
/// interview's own turns and insights, so calls for different interviews can
/// run concurrently.
///
/// # Errors
/// Returns `Error::InvalidInput` for malformed input (duplicate turn ids,
/// insight without a type) - the only fatal per-interview condition.
pub async fn process_interview(
    interview: InterviewAnnotation,
    params: ScoringParams,
) -> qice_common::Result<(InterviewAnalysis, ValidationSession)> {
    interview.validate()?;

    let tag_extractor = TagExtractor::new();
    let phrase_extractor = PhraseExtractor::new(params.clone());
    let turn_set = TurnSet::from_turns(&interview.turns, &tag_extractor);

    // Tier 1: per-turn extraction
    let turn_metadata = interview
        .turns
        .iter()
        .map(|turn| extract_turn_metadata(turn, &tag_extractor, &phrase_extractor))
        .collect();

    // Tier 2 + 3: per-insight construction and citation validation
    let builder = CitationBuilder::new(params.clone());
    let citation_validator = CitationValidator::new(params.clone());
    let taxonomy = tag_extractor.taxonomy();

    let mut session = ValidationSession::new();
    let mut insight_citations: Vec<InterviewInsightCitation> = Vec::new();
    let mut summaries: Vec<InsightSummary> = Vec::new();

    for (index, seed) in interview.insights.iter().enumerate() {
        let insight_id = format!("{}_{}", seed.insight_type, index);
        let built = builder.create_citation(seed, &insight_id, taxonomy, &turn_set, None);
        let mut citation = built.citation;

        session.record_issues(built.rejected_references.iter().map(|r| {
            format!("missing turn {} referenced by insight {}", r.turn_id, insight_id)
        }));

        let insight_tags = taxonomy.theme_tags(&seed.theme);
        let insight_text = seed
            .content
            .clone()
            .unwrap_or_else(|| seed.theme.clone());

        for turn_citation in citation
            .primary_citations
            .iter_mut()
            .chain(citation.supporting_citations.iter_mut())
        {
            let record = match turn_set.get(turn_citation.turn_id) {
                Some(record) => record,
                // Built citations only reference known turns
                None => {
                    warn!(turn_id = turn_citation.turn_id, "Built citation lost its turn");
                    continue;
                }
            };

            let input = CitationCheckInput {
                citation: turn_citation.clone(),
                turn_text: record.text.clone(),
                insight_text: insight_text.clone(),
                insight_tags: insight_tags.clone(),
                turn_tags: record.tags.clone(),
            };
            let result = citation_validator
                .validate(&input)
                .await
                .map_err(|e| Error::Internal(e.to_string()))?;

            turn_citation.state = if result.is_valid() {
                CitationState::Validated
            } else {
                CitationState::Flagged
            };
            session.record_citation(&result);
        }

        summaries.push(InsightSummary {
            insight_id: insight_id.clone(),
            insight_type: seed.insight_type.clone(),
            theme: seed.theme.clone(),
            intensity: seed.intensity,
            primary_turn_ids: citation.primary_turn_ids(),
        });

        insight_citations.push(InterviewInsightCitation {
            interview_id: interview.interview_id.clone(),
            insight_type: seed.insight_type.clone(),
            insight_id,
            primary_turn_ids: citation.primary_turn_ids(),
            supporting_turn_ids: citation.supporting_turn_ids(),
            confidence_score: citation.confidence,
            citation_data: citation,
        });
    }

    // Interview-level coverage and quality
    let interview_validator = InterviewValidator::new(params);
    let insights: Vec<InsightCitation> = insight_citations
        .iter()
        .map(|c| c.citation_data.clone())
        .collect();
    let validation = interview_validator
        .validate(&InterviewValidationInput {
            interview_id: interview.interview_id.clone(),
            insights,
            turns: turn_set.clone(),
        })
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;
    session.record_issues(validation.issues.iter().cloned());

    let citation_set = InterviewCitationSet {
        interview_id: interview.interview_id.clone(),
        insights: summaries,
        turn_texts: interview
            .turns
            .iter()
            .map(|t| (t.turn_id, t.text.clone()))
            .collect(),
    };

    Ok((
        InterviewAnalysis {
            interview_id: interview.interview_id.clone(),
            turn_metadata,
            insight_citations,
            citation_set,
            validation,
        },
        session,
    ))
}
