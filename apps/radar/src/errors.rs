use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::Provider;

/// Errors raised by the normalize → dedup → score pipeline.
///
/// Only `EmptyCatalog` / `EmptyFallback` are fatal, and only at startup.
/// `MalformedRecord` drops a single record; the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Malformed {provider} record: {reason}")]
    MalformedRecord { provider: Provider, reason: String },

    #[error("Skill catalog is empty")]
    EmptyCatalog,

    #[error("Skill catalog has no fallback skills")]
    EmptyFallback,
}

impl PipelineError {
    pub fn malformed(provider: Provider, reason: impl Into<String>) -> Self {
        PipelineError::MalformedRecord {
            provider,
            reason: reason.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(e @ PipelineError::MalformedRecord { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_RECORD",
                e.to_string(),
            ),
            AppError::Pipeline(e) => {
                tracing::error!("Pipeline configuration error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PIPELINE_ERROR",
                    "The scoring pipeline is misconfigured".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_message_names_provider() {
        let err = PipelineError::malformed(Provider::Jsearch, "missing apply link");
        assert_eq!(
            err.to_string(),
            "Malformed jsearch record: missing apply link"
        );
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let resp = AppError::Validation("bad".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_catalog_maps_to_internal_error() {
        let resp = AppError::from(PipelineError::EmptyCatalog).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_malformed_record_maps_to_unprocessable() {
        let err = PipelineError::malformed(Provider::Tavily, "no url");
        let resp = AppError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
