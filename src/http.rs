//! HTTP surface — thin axum layer around the pipeline.
//!
//! Owns routing and serialization only; every decision lives in the core.
//! Intake rejections (`unsupported_format`, `decode_error`) come back as
//! 400 with a structured `{error, message}` body.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::normalize::RawInput;
use crate::pipeline::{Pipeline, ProcessingOutcome};
use crate::stats::ProcessingStats;

/// Request body for `POST /api/v1/process`.
///
/// Exactly one of `text` or `file_base64` must be present; `file_kind` is
/// required alongside `file_base64`.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub file_base64: Option<String>,
    #[serde(default)]
    pub file_kind: Option<String>,
}

/// Structured failure body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn bad_request(error: &str, message: impl Into<String>) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: error.into(),
            message: message.into(),
        }),
    )
}

/// Build the application router.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/process", post(process))
        .route("/api/v1/stats", get(stats))
        .route("/api/v1/labels", get(labels))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(pipeline)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn process(
    State(pipeline): State<Arc<Pipeline>>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessingOutcome>, ErrorResponse> {
    let input = build_input(request)?;

    pipeline.process(input).await.map(Json).map_err(|e| {
        warn!(kind = e.kind(), error = %e, "Request rejected");
        bad_request(e.kind(), e.to_string())
    })
}

async fn stats(State(pipeline): State<Arc<Pipeline>>) -> Json<ProcessingStats> {
    Json(pipeline.snapshot())
}

async fn labels() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "labels": Pipeline::supported_labels() }))
}

/// Validate the request shape and decode it into a `RawInput`.
fn build_input(request: ProcessRequest) -> Result<RawInput, ErrorResponse> {
    match (request.text, request.file_base64) {
        (Some(_), Some(_)) => Err(bad_request(
            "invalid_request",
            "provide either text or file_base64, not both",
        )),
        (None, None) => Err(bad_request(
            "invalid_request",
            "either text or file_base64 must be provided",
        )),
        (Some(text), None) => Ok(RawInput::Text {
            text,
            subject: request.subject,
        }),
        (None, Some(encoded)) => {
            let kind = request.file_kind.ok_or_else(|| {
                bad_request("invalid_request", "file_kind is required with file_base64")
            })?;
            let bytes = BASE64
                .decode(encoded.as_bytes())
                .map_err(|e| bad_request("invalid_request", format!("invalid base64: {e}")))?;
            Ok(RawInput::File {
                bytes,
                kind,
                subject_hint: request.subject,
            })
        }
    }
}
