//! Stats aggregator — running counts and means over processed documents.
//!
//! The only shared mutable state in the crate. `record` is one critical
//! section so `total_processed`, the label counters, and both running means
//! always move together; `snapshot` clones under the same lock and can
//! never observe a half-applied update.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Label;
use crate::pipeline::ProcessingOutcome;

/// Point-in-time statistics snapshot.
///
/// Invariant: `productive_count + unproductive_count == total_processed`.
/// Lifecycle is process start to shutdown — nothing is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_processed: u64,
    pub productive_count: u64,
    pub unproductive_count: u64,
    pub average_confidence: f64,
    pub average_processing_time_ms: f64,
    pub last_processed_at: Option<DateTime<Utc>>,
}

/// Concurrent-safe aggregator over `ProcessingStats`.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    inner: Mutex<ProcessingStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed outcome as a single atomic update.
    ///
    /// Running means use the incremental formula
    /// `new = old + (value - old) / count` so no history is stored.
    pub fn record(&self, outcome: &ProcessingOutcome) {
        let mut stats = self.inner.lock().unwrap();

        stats.total_processed += 1;
        match outcome.classification.label {
            Label::Productive => stats.productive_count += 1,
            Label::Unproductive => stats.unproductive_count += 1,
        }

        let count = stats.total_processed as f64;
        stats.average_confidence +=
            (outcome.classification.confidence - stats.average_confidence) / count;
        stats.average_processing_time_ms +=
            (outcome.processing_time_ms as f64 - stats.average_processing_time_ms) / count;
        stats.last_processed_at = Some(outcome.processed_at);
    }

    /// Consistent point-in-time copy of the current stats.
    pub fn snapshot(&self) -> ProcessingStats {
        self.inner.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::classify::ClassificationResult;
    use crate::normalize::SourceFormat;
    use crate::pipeline::DocumentSummary;
    use crate::respond::{SuggestedResponse, Tone};

    fn outcome(label: Label, confidence: f64, time_ms: u64) -> ProcessingOutcome {
        ProcessingOutcome {
            id: Uuid::new_v4(),
            document: DocumentSummary {
                subject: None,
                source_format: SourceFormat::PlainText,
                word_count: 5,
                language: "pt".into(),
                has_attachments: false,
                raw_byte_length: 42,
            },
            classification: ClassificationResult {
                label,
                confidence,
                reasoning: "test".into(),
                model_used: "heuristic".into(),
            },
            response: SuggestedResponse {
                subject: None,
                body: "ok".into(),
                tone: Tone::Friendly,
                language: "pt".into(),
            },
            processing_time_ms: time_ms,
            processed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_aggregator_snapshot() {
        let stats = StatsAggregator::new().snapshot();
        assert_eq!(stats.total_processed, 0);
        assert!(stats.last_processed_at.is_none());
    }

    #[test]
    fn counters_and_means_track_records() {
        let aggregator = StatsAggregator::new();
        aggregator.record(&outcome(Label::Productive, 0.8, 10));
        aggregator.record(&outcome(Label::Unproductive, 0.6, 30));
        aggregator.record(&outcome(Label::Productive, 1.0, 20));

        let stats = aggregator.snapshot();
        assert_eq!(stats.total_processed, 3);
        assert_eq!(stats.productive_count, 2);
        assert_eq!(stats.unproductive_count, 1);
        assert!((stats.average_confidence - 0.8).abs() < 1e-9);
        assert!((stats.average_processing_time_ms - 20.0).abs() < 1e-9);
        assert!(stats.last_processed_at.is_some());
    }

    #[test]
    fn label_counters_always_sum_to_total() {
        let aggregator = StatsAggregator::new();
        for i in 0..25 {
            let label = if i % 3 == 0 {
                Label::Productive
            } else {
                Label::Unproductive
            };
            aggregator.record(&outcome(label, 0.5, i));

            let stats = aggregator.snapshot();
            assert_eq!(
                stats.productive_count + stats.unproductive_count,
                stats.total_processed
            );
        }
    }

    #[test]
    fn concurrent_records_stay_consistent() {
        let aggregator = Arc::new(StatsAggregator::new());
        let mut handles = Vec::new();

        for t in 0..8 {
            let aggregator = Arc::clone(&aggregator);
            handles.push(std::thread::spawn(move || {
                let label = if t % 2 == 0 {
                    Label::Productive
                } else {
                    Label::Unproductive
                };
                for _ in 0..100 {
                    aggregator.record(&outcome(label, 0.75, 12));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = aggregator.snapshot();
        assert_eq!(stats.total_processed, 800);
        assert_eq!(stats.productive_count, 400);
        assert_eq!(stats.unproductive_count, 400);
        assert!((stats.average_confidence - 0.75).abs() < 1e-9);
        assert!((stats.average_processing_time_ms - 12.0).abs() < 1e-9);
    }
}
