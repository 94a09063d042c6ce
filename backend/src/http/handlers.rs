//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! overlay registry for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    HealthResponse, OpenOverlayRequest, OpenOverlayResponse, OverlayListResponse,
    OverlayViewModel, SelectQuery, SortQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{TestId, TestSortKey};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the analysis server is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let upstream = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        upstream,
        open_overlays: state.overlays.len(),
    }))
}

// =============================================================================
// Overlays
// =============================================================================

/// GET /v1/overlays
pub async fn list_overlays(State(state): State<AppState>) -> HandlerResult<OverlayListResponse> {
    let overlays = state.overlays.list();
    let total = overlays.len();
    Ok(Json(OverlayListResponse { overlays, total }))
}

/// POST /v1/overlays
///
/// Open an overlay. Responds once every request for the component has settled.
pub async fn open_overlay(
    State(state): State<AppState>,
    Json(request): Json<OpenOverlayRequest>,
) -> Result<(StatusCode, Json<OpenOverlayResponse>), AppError> {
    if request.component_key.as_str().is_empty() || request.component_id.as_str().is_empty() {
        return Err(AppError::BadRequest(
            "componentKey and componentId must not be empty".to_string(),
        ));
    }

    let (overlay_id, view) = state.overlays.open(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(OpenOverlayResponse { overlay_id, view }),
    ))
}

/// GET /v1/overlays/{overlay_id}
pub async fn get_overlay(
    State(state): State<AppState>,
    Path(overlay_id): Path<String>,
) -> HandlerResult<OverlayViewModel> {
    Ok(Json(state.overlays.view(&overlay_id).await?))
}

/// POST /v1/overlays/{overlay_id}/tests/sort?key=name|duration|status
pub async fn sort_tests(
    State(state): State<AppState>,
    Path(overlay_id): Path<String>,
    Query(query): Query<SortQuery>,
) -> HandlerResult<OverlayViewModel> {
    let key: TestSortKey = query.key.parse().map_err(AppError::BadRequest)?;
    Ok(Json(state.overlays.sort_tests(&overlay_id, key).await?))
}

/// POST /v1/overlays/{overlay_id}/tests/{test_id}/select?scroll=<px>
pub async fn select_test(
    State(state): State<AppState>,
    Path((overlay_id, test_id)): Path<(String, String)>,
    Query(query): Query<SelectQuery>,
) -> HandlerResult<OverlayViewModel> {
    let test_id = TestId::from(test_id);
    Ok(Json(
        state
            .overlays
            .select_test(&overlay_id, &test_id, query.scroll)
            .await?,
    ))
}

/// DELETE /v1/overlays/{overlay_id}
pub async fn close_overlay(
    State(state): State<AppState>,
    Path(overlay_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.overlays.close(&overlay_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Overlay {} is not open", overlay_id)))
    }
}
