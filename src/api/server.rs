//! HTTP server lifecycle: bind, mount the router, serve until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::router::api_router;
use crate::session::AppState;

/// Bind `addr` and serve the API until the process exits.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "API server listening");

    let router = api_router(state);
    axum::serve(listener, router).await
}
