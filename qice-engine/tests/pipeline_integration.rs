//! End-to-end pipeline integration tests
//!
//! Drives the full analysis over a small annotated corpus: extraction →
//! citation construction → validation → corpus aggregation, checking the
//! evidentiary chain all the way down to literal turn text.

use qice_common::annotation::InterviewAnnotation;
use qice_common::events::{AnalysisEvent, EventBus};
use qice_common::params::ScoringParams;
use qice_engine::workflow::{AnalysisPipeline, PipelineConfig};

/// Route engine tracing through the test harness (RUST_LOG controls level)
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One interview where security dominates, built from annotator-shaped JSON
fn security_interview(id: &str) -> InterviewAnnotation {
    let json = format!(
        r#"{{
        "interview_id": "{id}",
        "turns": [
            {{
                "turn_id": 1,
                "speaker": "interviewer",
                "text": "Que es lo que mas le preocupa del barrio?"
            }},
            {{
                "turn_id": 7,
                "speaker": "participant",
                "text": "No puedo dormir pensando en los robos",
                "functional_analysis": {{"primary_function": "problem_identification"}},
                "content_analysis": {{"topics": ["seguridad"]}},
                "emotional_analysis": {{"primary_emotion": "fear", "emotional_intensity": 0.9}},
                "evidence_analysis": {{"evidence_type": "personal_experience"}}
            }},
            {{
                "turn_id": 12,
                "speaker": "participant",
                "text": "Los vecinos ya no salen de noche por miedo a los asaltos",
                "content_analysis": {{"topics": ["seguridad"]}},
                "emotional_analysis": {{"primary_emotion": "fear", "emotional_intensity": 0.7}}
            }}
        ],
        "insights": [
            {{
                "insight_type": "priority",
                "theme": "Seguridad",
                "content": "La seguridad nocturna es la prioridad principal",
                "intensity": 0.85,
                "citations": {{
                    "turn_ids": [7, 12],
                    "citation_details": [
                        {{"turn_id": 7, "contribution_type": "primary_evidence",
                          "quote": "pensando en los robos", "reason": "direct testimony"}},
                        {{"turn_id": 12, "contribution_type": "supporting",
                          "quote": "no salen de noche", "reason": "corroboration"}}
                    ]
                }}
            }}
        ]
    }}"#
    );
    serde_json::from_str(&json).expect("valid interview JSON")
}

/// An interview about housing, no security theme
fn housing_interview(id: &str) -> InterviewAnnotation {
    let json = format!(
        r#"{{
        "interview_id": "{id}",
        "turns": [
            {{
                "turn_id": 1,
                "speaker": "participant",
                "text": "Las casas de esta zona se llueven cada invierno",
                "content_analysis": {{"topics": ["vivienda"]}},
                "emotional_analysis": {{"primary_emotion": "frustration", "emotional_intensity": 0.6}}
            }}
        ],
        "insights": [
            {{
                "insight_type": "priority",
                "theme": "Vivienda",
                "intensity": 0.6,
                "citations": {{
                    "turn_ids": [1],
                    "citation_details": [
                        {{"turn_id": 1, "contribution_type": "primary_evidence",
                          "quote": "se llueven cada invierno"}}
                    ]
                }}
            }}
        ]
    }}"#
    );
    serde_json::from_str(&json).expect("valid interview JSON")
}

/// Interview with duplicate turn ids - malformed, must fail alone
fn malformed_interview(id: &str) -> InterviewAnnotation {
    let json = format!(
        r#"{{
        "interview_id": "{id}",
        "turns": [
            {{"turn_id": 1, "speaker": "participant", "text": "primera"}},
            {{"turn_id": 1, "speaker": "participant", "text": "repetida"}}
        ],
        "insights": []
    }}"#
    );
    serde_json::from_str(&json).expect("valid interview JSON")
}

#[tokio::test]
async fn full_pipeline_builds_traceable_chain() {
    init_tracing();
    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let corpus = vec![
        security_interview("int_001"),
        security_interview("int_002"),
        security_interview("int_003"),
        housing_interview("int_004"),
    ];

    let analysis = pipeline.process_corpus(corpus).await.unwrap();

    assert_eq!(analysis.interviews.len(), 4);
    assert!(analysis.failed_interviews.is_empty());

    // Security appears in 3 of 4 interviews
    let security = analysis
        .patterns
        .iter()
        .find(|p| p.theme == "seguridad")
        .expect("security pattern");
    assert!((security.prevalence - 0.75).abs() < 1e-9);
    assert_eq!(security.confidence, 0.9); // min(0.9, 1.5)
    assert_eq!(security.supporting_interviews.len(), 3);

    // The chain reaches literal turn text at the leaves
    let record = analysis
        .pattern_records
        .iter()
        .find(|r| r.insight_id == security.insight_id)
        .expect("security record");
    assert_eq!(record.supporting_interview_ids.len(), 3);
    let leaf_texts: Vec<&str> = record
        .citation_chain
        .interviews
        .iter()
        .flat_map(|i| i.turns.iter().map(|t| t.text.as_str()))
        .collect();
    assert!(leaf_texts.contains(&"No puedo dormir pensando en los robos"));

    // A validation report always accompanies citation output
    assert!(analysis.report.citations_checked > 0);
    assert!(analysis.report.validity_rate > 0.0);
}

#[tokio::test]
async fn relevance_and_confidence_stay_in_unit_interval() {
    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let analysis = pipeline
        .process_corpus(vec![security_interview("int_001")])
        .await
        .unwrap();

    for record in &analysis.interviews[0].insight_citations {
        assert!(record.confidence_score >= 0.0 && record.confidence_score <= 1.0);
        for citation in record
            .citation_data
            .primary_citations
            .iter()
            .chain(record.citation_data.supporting_citations.iter())
        {
            assert!(citation.relevance_score >= 0.0 && citation.relevance_score <= 1.0);
            // Every cited turn resolves within the interview
            assert!(analysis.interviews[0]
                .citation_set
                .turn_texts
                .contains_key(&citation.turn_id));
        }
    }
}

#[tokio::test]
async fn exact_quote_scores_full_relevance() {
    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let analysis = pipeline
        .process_corpus(vec![security_interview("int_001")])
        .await
        .unwrap();

    let insight = &analysis.interviews[0].insight_citations[0];
    // Tags fully overlap and the quote is a literal substring:
    // 0.5 + 0.3 + 0.2 = 1.0
    let primary = &insight.citation_data.primary_citations[0];
    assert_eq!(primary.turn_id, 7);
    assert!((primary.relevance_score - 1.0).abs() < 1e-9);
    assert_eq!(insight.primary_turn_ids, vec![7]);
    assert_eq!(insight.supporting_turn_ids, vec![12]);
}

#[tokio::test]
async fn malformed_interview_fails_alone() {
    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let corpus = vec![
        security_interview("int_001"),
        malformed_interview("int_bad"),
        security_interview("int_003"),
    ];

    let analysis = pipeline.process_corpus(corpus).await.unwrap();

    assert_eq!(analysis.interviews.len(), 2);
    assert_eq!(analysis.failed_interviews.len(), 1);
    assert_eq!(analysis.failed_interviews[0].interview_id, "int_bad");
    assert!(analysis.failed_interviews[0].error.contains("duplicate turn id"));

    // Prevalence is computed over the completed snapshot only
    let security = analysis
        .patterns
        .iter()
        .find(|p| p.theme == "seguridad")
        .expect("security pattern");
    assert!((security.prevalence - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn unknown_turn_reference_is_soft_and_reported() {
    let mut interview = security_interview("int_001");
    interview.insights[0].citations.citation_details[0].turn_id = 99;
    interview.insights[0].citations.turn_ids = vec![99, 12];

    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let analysis = pipeline.process_corpus(vec![interview]).await.unwrap();

    // The insight survives without the bad reference
    let insight = &analysis.interviews[0].insight_citations[0];
    assert!(insight.primary_turn_ids.is_empty());
    assert_eq!(insight.supporting_turn_ids, vec![12]);
    // Zero primary evidence caps confidence
    assert!(insight.confidence_score <= 0.3);

    // The rejected reference lands in the report
    assert!(analysis
        .report
        .missing_citations
        .iter()
        .any(|i| i.contains("missing turn 99")));
}

#[tokio::test]
async fn uncited_insight_flagged_never_dropped() {
    let mut interview = security_interview("int_001");
    interview.insights[0].citations.turn_ids.clear();
    interview.insights[0].citations.citation_details.clear();

    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let analysis = pipeline.process_corpus(vec![interview]).await.unwrap();

    // Still present in output, with floor-level confidence
    let insight = &analysis.interviews[0].insight_citations[0];
    assert!(insight.citation_data.is_uncited());
    assert!(insight.confidence_score <= 0.3);

    assert!(analysis
        .report
        .missing_citations
        .iter()
        .any(|i| i.contains("no citations for insight")));
}

#[tokio::test]
async fn insight_citation_round_trips_through_contract_json() {
    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let analysis = pipeline
        .process_corpus(vec![security_interview("int_001")])
        .await
        .unwrap();

    let original = &analysis.interviews[0].insight_citations[0];
    let json = serde_json::to_string(original).unwrap();
    let parsed: qice_common::citation::InterviewInsightCitation =
        serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.primary_turn_ids, original.primary_turn_ids);
    assert_eq!(parsed.supporting_turn_ids, original.supporting_turn_ids);
    assert_eq!(parsed.confidence_score, original.confidence_score);
    assert_eq!(
        parsed.citation_data.primary_citations.len(),
        original.citation_data.primary_citations.len()
    );
}

#[tokio::test]
async fn pipeline_emits_progress_events() {
    let bus = EventBus::new(100);
    let mut rx = bus.subscribe();

    let pipeline = AnalysisPipeline::with_events(PipelineConfig::default(), bus);
    pipeline
        .process_corpus(vec![
            security_interview("int_001"),
            malformed_interview("int_bad"),
        ])
        .await
        .unwrap();

    let mut started = 0;
    let mut completed = 0;
    let mut failed = 0;
    let mut aggregation_completed = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            AnalysisEvent::InterviewStarted { .. } => started += 1,
            AnalysisEvent::InterviewCompleted { .. } => completed += 1,
            AnalysisEvent::InterviewFailed { .. } => failed += 1,
            AnalysisEvent::AggregationCompleted { .. } => aggregation_completed += 1,
            _ => {}
        }
    }

    assert_eq!(started, 2);
    assert_eq!(completed, 1);
    assert_eq!(failed, 1);
    assert_eq!(aggregation_completed, 1);
}

#[tokio::test]
async fn validated_citations_carry_state() {
    let pipeline = AnalysisPipeline::new(PipelineConfig::default());
    let analysis = pipeline
        .process_corpus(vec![security_interview("int_001")])
        .await
        .unwrap();

    use qice_common::citation::CitationState;
    let data = &analysis.interviews[0].insight_citations[0].citation_data;
    for citation in data.primary_citations.iter().chain(data.supporting_citations.iter()) {
        assert_ne!(citation.state, CitationState::Unvalidated);
    }
}

#[tokio::test]
async fn tuned_params_change_pattern_threshold() {
    let mut params = ScoringParams::default();
    params.corpus_min_prevalence = 0.9;
    let pipeline = AnalysisPipeline::new(PipelineConfig {
        params,
        min_prevalence: None,
    });

    let analysis = pipeline
        .process_corpus(vec![
            security_interview("int_001"),
            security_interview("int_002"),
            housing_interview("int_003"),
        ])
        .await
        .unwrap();

    // Security sits at 2/3 prevalence, under the tuned 0.9 threshold
    assert!(analysis.patterns.iter().all(|p| p.theme != "seguridad"));
}
