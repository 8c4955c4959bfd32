//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::PipelineError;
use crate::session::{LoadError, StateError};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
///
/// Failures are local to the requested artifact kind: nothing here ever
/// touches other kinds' stored results or the extracted task list.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No process loaded")]
    NoProcess,
    #[error("Unknown artifact kind: {0}")]
    UnknownKind(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid BPMN document: {0}")]
    InvalidBpmn(String),
    #[error("No API credential configured")]
    NoCredential,
    #[error("Generation service failure: {0}")]
    Upstream(String),
    #[error("Generation service rejected the credential: {0}")]
    UpstreamAuth(String),
    #[error("Generation service returned no text")]
    EmptyGeneration,
    #[error("Generated text could not be parsed as a table: {0}")]
    UnparseableGeneration(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NoProcess => (
                StatusCode::CONFLICT,
                "NO_PROCESS",
                "Upload a BPMN document before requesting tasks or artifacts".to_string(),
            ),
            ApiError::UnknownKind(kind) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_KIND",
                format!("Unknown artifact kind: {kind}"),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::InvalidBpmn(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_BPMN",
                format!("Document rejected, not well-formed BPMN XML: {detail}"),
            ),
            ApiError::NoCredential => (
                StatusCode::SERVICE_UNAVAILABLE,
                "NO_CREDENTIAL",
                "No API credential configured. Set OPENAI_API_KEY to enable generation."
                    .to_string(),
            ),
            ApiError::UpstreamAuth(detail) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_AUTH",
                format!("Generation service rejected the configured credential: {detail}"),
            ),
            ApiError::Upstream(detail) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                format!("Generation service failure: {detail}"),
            ),
            ApiError::EmptyGeneration => (
                StatusCode::BAD_GATEWAY,
                "EMPTY_GENERATION",
                "The generation step returned no text".to_string(),
            ),
            ApiError::UnparseableGeneration(detail) => (
                StatusCode::BAD_GATEWAY,
                "UNPARSEABLE_GENERATION",
                format!("The generation step produced text that is not tabular: {detail}"),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidXml(detail) => ApiError::InvalidBpmn(detail),
            PipelineError::MissingApiKey => ApiError::NoCredential,
            PipelineError::AuthRejected { status, body } => {
                ApiError::UpstreamAuth(format!("status {status}: {body}"))
            }
            PipelineError::ServiceStatus { status, body } => {
                ApiError::Upstream(format!("status {status}: {body}"))
            }
            PipelineError::HttpClient(detail) => ApiError::Upstream(detail),
            PipelineError::EmptyResponse => ApiError::EmptyGeneration,
            PipelineError::TableParse(detail) => ApiError::UnparseableGeneration(detail),
            PipelineError::ResponseParsing(detail) => ApiError::Upstream(detail),
        }
    }
}

impl From<StateError> for ApiError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::NoProcess => ApiError::NoProcess,
            StateError::LockPoisoned => ApiError::Internal("state lock poisoned".into()),
        }
    }
}

impl From<LoadError> for ApiError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Pipeline(e) => e.into(),
            LoadError::State(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_distinct_codes() {
        assert!(matches!(
            ApiError::from(PipelineError::MissingApiKey),
            ApiError::NoCredential
        ));
        assert!(matches!(
            ApiError::from(PipelineError::TableParse("bad".into())),
            ApiError::UnparseableGeneration(_)
        ));
        assert!(matches!(
            ApiError::from(PipelineError::AuthRejected {
                status: 401,
                body: "nope".into()
            }),
            ApiError::UpstreamAuth(_)
        ));
    }

    #[test]
    fn invalid_bpmn_is_unprocessable() {
        let response = ApiError::InvalidBpmn("oops".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
