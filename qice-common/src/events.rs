//! Event types for the QICE analysis pipeline
//!
//! Provides shared event definitions and the EventBus used to observe a
//! running analysis. Events are progress/diagnostic signals only - no
//! component makes decisions based on them.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Analysis pipeline events
///
/// Emitted by the workflow orchestrator as interviews fan out and the corpus
/// aggregation fan-in runs. Serializable for forwarding to whatever surface
/// observes a run (log sink, progress UI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// An analysis run started
    AnalysisStarted {
        /// Analysis run id (one per invocation; re-runs get a new id)
        run_id: Uuid,
        /// Number of interviews queued for processing
        interview_count: usize,
        /// When the run started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Per-interview processing started
    InterviewStarted {
        run_id: Uuid,
        interview_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Per-interview processing finished successfully
    InterviewCompleted {
        run_id: Uuid,
        interview_id: String,
        /// Number of insights that produced citation records
        insight_count: usize,
        /// Total citations constructed (primary + supporting)
        citation_count: usize,
        /// Insights that arrived with no usable citations (flagged, not dropped)
        uncited_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Per-interview processing failed (malformed input); remaining
    /// interviews are unaffected
    InterviewFailed {
        run_id: Uuid,
        interview_id: String,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Corpus aggregation fan-in started (all interview tasks joined)
    AggregationStarted {
        run_id: Uuid,
        /// Interviews that completed and feed the theme index
        interview_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Corpus aggregation finished
    AggregationCompleted {
        run_id: Uuid,
        /// Cross-interview patterns that met the prevalence threshold
        pattern_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The whole run finished
    AnalysisCompleted {
        run_id: Uuid,
        /// Interviews processed successfully
        completed: usize,
        /// Interviews that failed input validation
        failed: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus for analysis events
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block the pipeline)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AnalysisEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    /// * `capacity` - Number of events to buffer before dropping old events
    ///   (1000 for normal runs, 10-100 for tests)
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` when nobody is listening. Callers treat both as non-fatal.
    pub fn emit(
        &self,
        event: AnalysisEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<AnalysisEvent>> {
        self.tx.send(event)
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
