use serde::{Deserialize, Serialize};

use crate::api::{
    Component, CoveredFile, DerivedMeasures, IssueFacets, MeasuresMap, MetricGroup, TestCase,
    TestSortState,
};

// =========================================================
// Overlay view-model
// =========================================================

/// The test currently drilled into, with the files it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTest {
    pub test: TestCase,
    pub covered_files: Vec<CoveredFile>,
}

/// Everything the rendering layer needs to draw the overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayViewModel {
    pub component: Component,
    pub measures: MeasuresMap,
    pub derived: DerivedMeasures,
    pub measures_to_display: Vec<MetricGroup>,
    #[serde(flatten)]
    pub issues: IssueFacets,
    /// `None` when the component is not a unit-test file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<TestCase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_sorting: Option<TestSortState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_test: Option<TestCase>,
    /// Files covered by the selected test; empty before any selection.
    pub covered_files: Vec<CoveredFile>,
    /// Scroll offset of the test list saved at the last drill-down.
    pub tests_scroll: u32,
}
