//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

/// Default external-model timeout. Callers must never block past this.
const DEFAULT_EXTERNAL_TIMEOUT_MS: u64 = 5_000;

/// Pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// External classification model. `None` disables the strategy and the
    /// heuristic handles everything.
    pub external_model: Option<ExternalModelConfig>,
    /// Surface `UnsupportedLanguage` instead of degrading to the Portuguese
    /// template when no template exists for the detected language.
    pub strict_language: bool,
}

impl PipelineConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Self {
        let strict_language = std::env::var("TRIAGE_STRICT_LANGUAGE")
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            external_model: ExternalModelConfig::from_env(),
            strict_language,
        }
    }
}

/// External classification model configuration.
#[derive(Debug, Clone)]
pub struct ExternalModelConfig {
    /// Classification endpoint (receives `{model, text}`, returns `{label, score}`).
    pub endpoint: String,
    /// Optional bearer token.
    pub api_key: Option<SecretString>,
    /// Model identifier, reported as `model_used` on results it produces.
    pub model_id: String,
    /// Hard deadline for the single classification attempt.
    pub timeout: Duration,
}

impl ExternalModelConfig {
    /// Build config from environment variables.
    /// Returns `None` if `CLASSIFIER_URL` is not set (strategy disabled).
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("CLASSIFIER_URL").ok()?;

        let api_key = std::env::var("CLASSIFIER_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        let model_id =
            std::env::var("CLASSIFIER_MODEL").unwrap_or_else(|_| "external-classifier".to_string());

        let timeout_ms: u64 = std::env::var("CLASSIFIER_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_EXTERNAL_TIMEOUT_MS);

        Some(Self {
            endpoint,
            api_key,
            model_id,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8000".
    pub bind: String,
}

impl ServerConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Self {
        let bind =
            std::env::var("MAIL_TRIAGE_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        Self { bind }
    }
}
