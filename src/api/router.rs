//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::session::AppState;

/// Build the API router with all routes under `/api/`.
///
/// Handlers use `State<ApiContext>` (provided via `with_state`).
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/process", post(endpoints::process::upload))
        .route("/process/tasks", get(endpoints::process::tasks))
        .route("/process/diagram", get(endpoints::process::diagram))
        .route("/artifacts/:kind", post(endpoints::artifacts::generate))
        .route("/artifacts/:kind", get(endpoints::artifacts::latest))
        .route(
            "/artifacts/:kind/csv",
            get(endpoints::artifacts::download_csv),
        )
        .with_state(ctx);

    Router::new().nest("/api", routes)
}
