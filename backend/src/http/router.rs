//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route(
            "/overlays",
            get(handlers::list_overlays).post(handlers::open_overlay),
        )
        .route(
            "/overlays/{overlay_id}",
            get(handlers::get_overlay).delete(handlers::close_overlay),
        )
        .route("/overlays/{overlay_id}/tests/sort", post(handlers::sort_tests))
        .route(
            "/overlays/{overlay_id}/tests/{test_id}/select",
            post(handlers::select_test),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
