//! External-model scoring strategy — HTTP adapter.
//!
//! Delegates scoring to a configured classification service. The adapter
//! contract: one idempotent POST per document, bounded by the configured
//! timeout, and every failure mode (timeout, connect error, non-2xx,
//! malformed body, unknown label) maps to `ExternalModelError` so the
//! engine can fall through to the heuristic.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::classify::{ClassificationResult, Label};
use crate::config::ExternalModelConfig;
use crate::error::ExternalModelError;

/// Request body sent to the external service.
#[derive(Debug, Serialize)]
struct ExternalRequest<'a> {
    model: &'a str,
    text: &'a str,
}

/// Response body expected from the external service.
#[derive(Debug, Deserialize)]
struct ExternalResponse {
    label: String,
    score: f64,
    #[serde(default)]
    reasoning: Option<String>,
}

/// HTTP client for the external classification service.
pub struct ExternalModelClient {
    http: reqwest::Client,
    config: ExternalModelConfig,
}

impl ExternalModelClient {
    pub fn new(config: ExternalModelConfig) -> Result<Self, ExternalModelError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExternalModelError::Request(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Model identifier reported as `model_used` on results.
    pub fn model_id(&self) -> &str {
        &self.config.model_id
    }

    /// Classify `text` via the external service. Single attempt, no retry.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, ExternalModelError> {
        let request = self.build_request(text);

        // The client carries its own timeout, but wrapping the whole
        // send-and-read sequence keeps the deadline independent of how the
        // service dribbles out its response body.
        let response = tokio::time::timeout(self.config.timeout, async {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    ExternalModelError::Timeout {
                        timeout: self.config.timeout,
                    }
                } else {
                    ExternalModelError::Request(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ExternalModelError::Status {
                    status: status.as_u16(),
                });
            }

            response
                .json::<ExternalResponse>()
                .await
                .map_err(|e| ExternalModelError::InvalidResponse(e.to_string()))
        })
        .await
        .map_err(|_| ExternalModelError::Timeout {
            timeout: self.config.timeout,
        })??;

        self.map_response(response)
    }

    fn build_request(&self, text: &str) -> reqwest::RequestBuilder {
        let body = ExternalRequest {
            model: &self.config.model_id,
            text,
        };
        let mut builder = self.http.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        builder
    }

    /// Map the service's `{label, score}` into a `ClassificationResult`.
    fn map_response(
        &self,
        response: ExternalResponse,
    ) -> Result<ClassificationResult, ExternalModelError> {
        let label = match response.label.trim().to_ascii_uppercase().as_str() {
            "PRODUCTIVE" => Label::Productive,
            "UNPRODUCTIVE" => Label::Unproductive,
            other => {
                return Err(ExternalModelError::InvalidResponse(format!(
                    "unknown label: '{other}'"
                )));
            }
        };

        Ok(ClassificationResult {
            label,
            confidence: response.score.clamp(0.0, 1.0),
            reasoning: response
                .reasoning
                .unwrap_or_else(|| format!("classified by {}", self.config.model_id)),
            model_used: self.config.model_id.clone(),
        })
    }
}
