//! Service status endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub credential_configured: bool,
    pub process_loaded: bool,
}

/// `GET /api/health` — service status: whether a generation credential is
/// configured and whether a process document is loaded.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model: ctx.state.config.model.clone(),
        credential_configured: ctx.state.config.has_credential(),
        process_loaded: ctx.state.process_loaded(),
    }))
}
