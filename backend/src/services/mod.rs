//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer that sits between the repositories
//! and the rendering layer. Services orchestrate repository calls and shape
//! the results into the overlay view-model.

pub mod coverage;
pub mod formatting;
pub mod issues;
pub mod measures;
pub mod metrics;
pub mod overlay;
pub mod overlay_registry;
pub mod severity;
pub mod test_results;


pub use coverage::fetch_covered_files;
pub use formatting::{DefaultMeasureFormatter, MeasureFormatter};
pub use issues::{build_issue_facets, fetch_issue_facets, sort_types_facet};
pub use measures::{
    compute_display_measures, derive_measures, fetch_display_measures, group_metrics,
    metric_keys_to_request,
};
pub use metrics::{displayable_metrics, fetch_metrics};
pub use overlay::{
    MeasuresOverlay, NoopRenderer, OverlayContext, OverlayOptions, OverlayRenderer,
    DEFAULT_METRICS_PAGE_SIZE,
};
pub use overlay_registry::{OverlayRegistry, OverlaySummary};
pub use severity::{DefaultSeverityComparator, SeverityComparator};
pub use test_results::{compare_tests, fetch_tests, request_sort, sort_tests};
