//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::{OverlayContext, OverlayRegistry};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance used for health checks
    pub repository: Arc<dyn FullRepository>,
    /// Open overlays
    pub overlays: OverlayRegistry,
}

impl AppState {
    /// Create application state with default overlay collaborators.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_context(OverlayContext::new(repository))
    }

    /// Create application state from a fully configured overlay context.
    pub fn with_context(ctx: OverlayContext) -> Self {
        Self {
            repository: Arc::clone(ctx.repository()),
            overlays: OverlayRegistry::new(ctx),
        }
    }
}
