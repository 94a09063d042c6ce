//! Data Transfer Objects for the HTTP API.
//!
//! The overlay view-model is returned as-is; only the request bodies and the
//! small envelopes around it are defined here.

use serde::{Deserialize, Serialize};

pub use crate::api::OverlayViewModel;
use crate::api::{Component, ComponentId, ComponentKey};
pub use crate::services::OverlaySummary;

/// Request body for opening an overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOverlayRequest {
    /// Key used for the measures request
    pub component_key: ComponentKey,
    /// Id used for the issues and tests requests
    pub component_id: ComponentId,
    /// Whether the component is a unit-test file
    #[serde(default)]
    pub is_unit_test: bool,
}

impl From<OpenOverlayRequest> for Component {
    fn from(request: OpenOverlayRequest) -> Self {
        Component {
            key: request.component_key,
            id: request.component_id,
            is_unit_test: request.is_unit_test,
        }
    }
}

/// Response for opening an overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOverlayResponse {
    pub overlay_id: String,
    pub view: OverlayViewModel,
}

/// List of open overlays.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayListResponse {
    pub overlays: Vec<OverlaySummary>,
    pub total: usize,
}

/// Query parameters for sorting the test list.
#[derive(Debug, Clone, Deserialize)]
pub struct SortQuery {
    /// `name`, `duration` or `status`
    pub key: String,
}

/// Query parameters for selecting a test.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectQuery {
    /// Scroll offset of the test list, restored on re-render
    #[serde(default)]
    pub scroll: u32,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Reachability of the analysis server
    pub upstream: String,
    pub open_overlays: usize,
}
