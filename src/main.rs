use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use flowtag::api;
use flowtag::config::{self, AppConfig};
use flowtag::session::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    if config.has_credential() {
        tracing::info!(model = %config.model, "Generation service: configured");
    } else {
        tracing::warn!(
            "Generation service: not configured — set OPENAI_API_KEY to enable artifact generation"
        );
    }

    let addr = config.bind_addr;
    let state = Arc::new(AppState::new(config));
    api::server::serve(state, addr).await
}
