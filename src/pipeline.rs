//! Pipeline orchestrator — one `process` call per inbound document.
//!
//! Flow:
//! 1. Normalize raw input into an `EmailDocument`
//! 2. Extract features
//! 3. Classify (external model → heuristic fallback)
//! 4. Compose a suggested reply
//! 5. Record stats (success only)
//!
//! Wall-clock time is measured around the whole sequence. A normalization
//! or composition failure propagates a typed error and leaves the stats
//! untouched — failed intake attempts do not pollute statistics.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::classify::{ClassificationEngine, ClassificationResult, Label};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::{self, FeatureSet};
use crate::normalize::{self, EmailDocument, RawInput, SourceFormat};
use crate::respond::{ResponseComposer, SuggestedResponse};
use crate::stats::{ProcessingStats, StatsAggregator};

// ── Outcome ─────────────────────────────────────────────────────────

/// Compact view of the normalized document, returned with the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub subject: Option<String>,
    pub source_format: SourceFormat,
    pub word_count: usize,
    pub language: String,
    pub has_attachments: bool,
    pub raw_byte_length: usize,
}

impl DocumentSummary {
    fn new(doc: &EmailDocument, features: &FeatureSet) -> Self {
        Self {
            subject: doc.subject.clone(),
            source_format: doc.source_format,
            word_count: features.word_count,
            language: features.language.clone(),
            has_attachments: doc.has_attachments,
            raw_byte_length: doc.raw_byte_length,
        }
    }
}

/// Everything produced by one `process` call. Returned to the transport
/// layer, never retained by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub id: Uuid,
    pub document: DocumentSummary,
    pub classification: ClassificationResult,
    pub response: SuggestedResponse,
    pub processing_time_ms: u64,
    pub processed_at: DateTime<Utc>,
}

// ── Pipeline ────────────────────────────────────────────────────────

/// The full ingestion → classification → response pipeline.
///
/// Holds no per-request state; safe to share behind an `Arc` across
/// concurrent requests. The stats aggregator is the only shared mutable
/// resource and synchronizes internally.
pub struct Pipeline {
    engine: ClassificationEngine,
    composer: ResponseComposer,
    stats: StatsAggregator,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            engine: ClassificationEngine::new(config.external_model),
            composer: ResponseComposer::new(config.strict_language),
            stats: StatsAggregator::new(),
        }
    }

    /// Process one document through the full pipeline.
    pub async fn process(&self, input: RawInput) -> Result<ProcessingOutcome> {
        let started = Instant::now();

        let doc = normalize::normalize(input)?;
        let features = features::extract(&doc);
        let classification = self.engine.classify(&doc, &features).await;
        let response = self.composer.compose(&classification, &features, &doc)?;

        let outcome = ProcessingOutcome {
            id: Uuid::new_v4(),
            document: DocumentSummary::new(&doc, &features),
            classification,
            response,
            processing_time_ms: started.elapsed().as_millis() as u64,
            processed_at: Utc::now(),
        };

        self.stats.record(&outcome);
        info!(
            id = %outcome.id,
            label = %outcome.classification.label,
            confidence = outcome.classification.confidence,
            model = %outcome.classification.model_used,
            time_ms = outcome.processing_time_ms,
            "Document processed"
        );

        Ok(outcome)
    }

    /// Point-in-time statistics snapshot.
    pub fn snapshot(&self) -> ProcessingStats {
        self.stats.snapshot()
    }

    /// Labels the engine can produce, in wire form.
    pub fn supported_labels() -> [&'static str; 2] {
        Label::supported()
    }
}
