//! Error types for mail-triage.

use std::time::Duration;

/// Top-level error type for the pipeline.
///
/// Only normalization and (under strict language policy) composition
/// failures ever reach the caller. External-model failures are handled
/// inside the classification engine and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Composition error: {0}")]
    Compose(#[from] ComposeError),
}

impl Error {
    /// Stable machine-readable kind for the transport layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Normalize(NormalizeError::UnsupportedFormat { .. }) => "unsupported_format",
            Self::Normalize(NormalizeError::Decode { .. }) => "decode_error",
            Self::Compose(ComposeError::UnsupportedLanguage { .. }) => "unsupported_language",
        }
    }
}

/// Document normalization errors — the only rejection path for intake.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Unsupported file kind: {kind} (expected one of: text, pdf, eml)")]
    UnsupportedFormat { kind: String },

    #[error("Failed to decode {kind} input: {reason}")]
    Decode { kind: String, reason: String },
}

/// Response composition errors.
///
/// Surfaced only when the composer runs with a strict language policy;
/// the default policy degrades to the Portuguese template instead.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("No response template for language: {language}")]
    UnsupportedLanguage { language: String },
}

/// External-model adapter errors.
///
/// Never surfaced to the caller — any variant triggers fallback to the
/// heuristic strategy for that request, logged only.
#[derive(Debug, thiserror::Error)]
pub enum ExternalModelError {
    #[error("External model timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("External model request failed: {0}")]
    Request(String),

    #[error("External model returned HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid response from external model: {0}")]
    InvalidResponse(String),
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;
