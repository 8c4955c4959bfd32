//! Process document endpoints: upload, task list, and renderer handoff.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::Task;
use crate::session::ProcessSummary;

/// `POST /api/process` — upload a BPMN document (raw XML body), extract the
/// canonical task list, and replace the current session. Prior results for
/// all artifact kinds are discarded.
pub async fn upload(
    State(ctx): State<ApiContext>,
    body: String,
) -> Result<Json<ProcessSummary>, ApiError> {
    let summary = ctx.state.load_process(body)?;
    Ok(Json(summary))
}

#[derive(Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// `GET /api/process/tasks` — the canonical task list for the session.
pub async fn tasks(State(ctx): State<ApiContext>) -> Result<Json<TasksResponse>, ApiError> {
    let tasks = ctx.state.tasks()?;
    Ok(Json(TasksResponse { tasks }))
}

/// `GET /api/process/diagram` — the raw BPMN XML for the external renderer.
///
/// The `X-Needs-Auto-Layout` header tells the renderer whether the document
/// lacks diagram interchange info and needs an auto-layout pass first.
pub async fn diagram(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    let (xml, has_diagram) = ctx.state.diagram()?;
    let needs_layout = if has_diagram { "false" } else { "true" };
    Ok((
        [
            (header::CONTENT_TYPE.as_str(), "application/xml; charset=utf-8"),
            ("x-needs-auto-layout", needs_layout),
        ],
        xml,
    )
        .into_response())
}
