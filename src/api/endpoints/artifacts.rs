//! Artifact endpoints: trigger generation for one kind, fetch the latest
//! stored result, and download it as CSV.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::{ArtifactGenerator, ArtifactKind, ArtifactResult, OpenAiClient};

fn parse_kind(kind: &str) -> Result<ArtifactKind, ApiError> {
    kind.parse()
        .map_err(|_| ApiError::UnknownKind(kind.to_string()))
}

/// `POST /api/artifacts/{kind}` — run the generation pipeline for one kind.
///
/// The blocking pipeline (network round trip to the generation service) is
/// moved off the async runtime. On success the result overwrites the kind's
/// slot; on failure nothing is stored, leaving other kinds' results intact.
pub async fn generate(
    State(ctx): State<ApiContext>,
    Path(kind): Path<String>,
) -> Result<Json<ArtifactResult>, ApiError> {
    let kind = parse_kind(&kind)?;

    // Refuse before spending quota when no credential is configured.
    if !ctx.state.config.has_credential() {
        return Err(ApiError::NoCredential);
    }

    let tasks = ctx.state.tasks()?;
    let config = ctx.state.config.clone();

    let result = tokio::task::spawn_blocking(move || {
        let client = OpenAiClient::new(
            &config.api_base_url,
            &config.api_key,
            config.request_timeout_secs,
        );
        ArtifactGenerator::new(Box::new(client), &config.model).generate(kind, &tasks)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    ctx.state.store_result(result.clone())?;
    Ok(Json(result))
}

/// `GET /api/artifacts/{kind}` — the latest stored result for one kind.
pub async fn latest(
    State(ctx): State<ApiContext>,
    Path(kind): Path<String>,
) -> Result<Json<ArtifactResult>, ApiError> {
    let kind = parse_kind(&kind)?;
    ctx.state
        .result(kind)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No {kind} result generated yet")))
}

/// `GET /api/artifacts/{kind}/csv` — download the latest result as CSV.
pub async fn download_csv(
    State(ctx): State<ApiContext>,
    Path(kind): Path<String>,
) -> Result<Response, ApiError> {
    let kind = parse_kind(&kind)?;
    let result = ctx
        .state
        .result(kind)?
        .ok_or_else(|| ApiError::NotFound(format!("No {kind} result generated yet")))?;

    let csv = result
        .table
        .to_csv()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let disposition = format!("attachment; filename=\"{}\"", kind.csv_file_name());

    Ok((
        [
            (header::CONTENT_TYPE.as_str(), "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION.as_str(), disposition.as_str()),
        ],
        csv,
    )
        .into_response())
}
