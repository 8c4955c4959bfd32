//! Shared types for the API layer.

use std::sync::Arc;

use crate::session::AppState;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}
