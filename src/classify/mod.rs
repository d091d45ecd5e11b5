//! Classification engine — decides PRODUCTIVE vs UNPRODUCTIVE.
//!
//! Strategy chain, fixed priority order:
//! 1. External model (if configured) — bounded timeout, single attempt
//! 2. Heuristic scorer — always succeeds, floor of availability
//!
//! External failures are never surfaced to the caller: they are logged and
//! the chain falls through. The set of strategies is closed by design — a
//! tagged enum, not open-ended dynamic dispatch.

mod external;
mod heuristic;

pub use external::ExternalModelClient;
pub use heuristic::{HeuristicScorer, NO_SIGNAL_CONFIDENCE};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ExternalModelConfig;
use crate::error::ExternalModelError;
use crate::features::FeatureSet;
use crate::normalize::EmailDocument;

// ── Result types ────────────────────────────────────────────────────

/// The two classification labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "PRODUCTIVE")]
    Productive,
    #[serde(rename = "UNPRODUCTIVE")]
    Unproductive,
}

impl Label {
    /// Wire form of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productive => "PRODUCTIVE",
            Self::Unproductive => "UNPRODUCTIVE",
        }
    }

    /// All labels the engine can produce, in wire form.
    pub fn supported() -> [&'static str; 2] {
        ["PRODUCTIVE", "UNPRODUCTIVE"]
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one classification decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// In [0, 1]; monotone in the margin between the two label scores.
    pub confidence: f64,
    /// Human-readable explanation naming the dominant signal.
    pub reasoning: String,
    /// Which strategy produced the result ("heuristic" or the external
    /// model id).
    pub model_used: String,
}

// ── Strategy chain ──────────────────────────────────────────────────

/// A single scoring strategy. Closed set, tried in declaration order.
enum Strategy {
    External(ExternalModelClient),
    Heuristic(HeuristicScorer),
}

impl Strategy {
    fn name(&self) -> &str {
        match self {
            Self::External(client) => client.model_id(),
            Self::Heuristic(_) => heuristic::MODEL_ID,
        }
    }

    async fn score(
        &self,
        doc: &EmailDocument,
        features: &FeatureSet,
    ) -> Result<ClassificationResult, ExternalModelError> {
        match self {
            Self::External(client) => client.classify(&doc.text).await,
            Self::Heuristic(scorer) => Ok(scorer.score(doc, features)),
        }
    }
}

/// Classification engine with external-model fallback.
pub struct ClassificationEngine {
    strategies: Vec<Strategy>,
}

impl ClassificationEngine {
    /// Build the chain from configuration. With no external model the
    /// heuristic handles everything.
    pub fn new(external: Option<ExternalModelConfig>) -> Self {
        let mut strategies = Vec::with_capacity(2);

        if let Some(config) = external {
            match ExternalModelClient::new(config) {
                Ok(client) => strategies.push(Strategy::External(client)),
                Err(e) => {
                    warn!(error = %e, "External model client unavailable — heuristic only");
                }
            }
        }
        strategies.push(Strategy::Heuristic(HeuristicScorer::new()));

        Self { strategies }
    }

    /// Heuristic-only engine.
    pub fn heuristic_only() -> Self {
        Self::new(None)
    }

    /// Classify a document. Always returns a result — strategy failures
    /// fall through to the next entry in the chain, and the heuristic
    /// never fails.
    pub async fn classify(
        &self,
        doc: &EmailDocument,
        features: &FeatureSet,
    ) -> ClassificationResult {
        for strategy in &self.strategies {
            match strategy.score(doc, features).await {
                Ok(result) => {
                    debug!(
                        model = %result.model_used,
                        label = %result.label,
                        confidence = result.confidence,
                        "Classification complete"
                    );
                    return result;
                }
                Err(e) => {
                    warn!(
                        strategy = strategy.name(),
                        error = %e,
                        "Classification strategy failed — falling through"
                    );
                }
            }
        }

        // The chain always ends with the heuristic, which cannot fail.
        HeuristicScorer::new().score(doc, features)
    }
}
