//! Overlay controller.
//!
//! A [`MeasuresOverlay`] owns all state shown for one open component. Opening
//! fans out to the measures, issues and (for unit-test files) tests requests,
//! waits for every one of them to settle and renders once. Sorting and
//! drill-down mutate the state and render again.

use futures::future::OptionFuture;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::api::{
    Component, CoveredFile, DisplayMeasures, IssueFacets, MeasuresMap, OverlayViewModel,
    SelectedTest, TestCase, TestId, TestSortKey, TestSortState,
};
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::services::coverage::fetch_covered_files;
use crate::services::formatting::{DefaultMeasureFormatter, MeasureFormatter};
use crate::services::issues::fetch_issue_facets;
use crate::services::measures::fetch_display_measures;
use crate::services::severity::{DefaultSeverityComparator, SeverityComparator};
use crate::services::test_results::{fetch_tests, request_sort};

/// Page size that returns the whole metric catalog in one request.
pub const DEFAULT_METRICS_PAGE_SIZE: u32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    pub metrics_page_size: u32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            metrics_page_size: DEFAULT_METRICS_PAGE_SIZE,
        }
    }
}

/// Rendering layer fed with the prepared view-model.
pub trait OverlayRenderer: Send + Sync {
    fn render(&self, view: &OverlayViewModel);
}

/// Renderer that draws nothing, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl OverlayRenderer for NoopRenderer {
    fn render(&self, _view: &OverlayViewModel) {}
}

/// Collaborators shared by every overlay opened from it.
#[derive(Clone)]
pub struct OverlayContext {
    repo: Arc<dyn FullRepository>,
    formatter: Arc<dyn MeasureFormatter>,
    severities: Arc<dyn SeverityComparator>,
    renderer: Arc<dyn OverlayRenderer>,
    options: OverlayOptions,
}

impl OverlayContext {
    /// Context with the default formatter, severity order and a no-op renderer.
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self {
            repo,
            formatter: Arc::new(DefaultMeasureFormatter),
            severities: Arc::new(DefaultSeverityComparator),
            renderer: Arc::new(NoopRenderer),
            options: OverlayOptions::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn MeasureFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_severity_comparator(mut self, severities: Arc<dyn SeverityComparator>) -> Self {
        self.severities = severities;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn OverlayRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_options(mut self, options: OverlayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn repository(&self) -> &Arc<dyn FullRepository> {
        &self.repo
    }

    pub fn options(&self) -> OverlayOptions {
        self.options
    }
}

/// State of the overlay for one open component.
pub struct MeasuresOverlay {
    ctx: OverlayContext,
    component: Component,
    measures: DisplayMeasures,
    issues: IssueFacets,
    /// `None` unless the component is a unit-test file.
    tests: Option<Vec<TestCase>>,
    sort_state: TestSortState,
    selected: Option<SelectedTest>,
    tests_scroll: u32,
}

impl MeasuresOverlay {
    /// Open the overlay for `component`.
    ///
    /// Every initiated request settles before the outcome is decided. On
    /// success the overlay renders once; on failure nothing is rendered and
    /// the first error (measures, then issues, then tests) is returned.
    pub async fn open(ctx: OverlayContext, component: Component) -> RepositoryResult<Self> {
        info!(
            "Opening overlay for {} (unit test: {})",
            component.key, component.is_unit_test
        );
        let repo = ctx.repo.as_ref();
        let previous = MeasuresMap::new();

        let measures = fetch_display_measures(
            repo,
            &component.key,
            &previous,
            ctx.options.metrics_page_size,
            ctx.formatter.as_ref(),
        );
        let issues = fetch_issue_facets(repo, &component.id, ctx.severities.as_ref());
        let tests: OptionFuture<_> = component
            .is_unit_test
            .then(|| fetch_tests(repo, &component.id))
            .into();

        let (measures, issues, tests) = tokio::join!(measures, issues, tests);
        let settled = (|| Ok::<_, RepositoryError>((measures?, issues?, tests.transpose()?)))();
        let (measures, issues, tests) = settled.map_err(|err| {
            warn!("Failed to open overlay for {}: {}", component.key, err);
            err
        })?;

        let overlay = Self {
            ctx,
            component,
            measures,
            issues,
            tests,
            sort_state: TestSortState::default(),
            selected: None,
            tests_scroll: 0,
        };
        overlay.render();
        Ok(overlay)
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn measures(&self) -> &DisplayMeasures {
        &self.measures
    }

    pub fn issues(&self) -> &IssueFacets {
        &self.issues
    }

    pub fn tests(&self) -> Option<&[TestCase]> {
        self.tests.as_deref()
    }

    pub fn sort_state(&self) -> TestSortState {
        self.sort_state
    }

    pub fn selected_test(&self) -> Option<&TestCase> {
        self.selected.as_ref().map(|s| &s.test)
    }

    /// Files covered by the selected test; empty when nothing is selected.
    pub fn covered_files(&self) -> &[CoveredFile] {
        self.selected
            .as_ref()
            .map(|s| s.covered_files.as_slice())
            .unwrap_or(&[])
    }

    pub fn tests_scroll(&self) -> u32 {
        self.tests_scroll
    }

    /// Sort the test list by `key` and re-render.
    ///
    /// Ignored when the component has no test list.
    pub fn sort_tests(&mut self, key: TestSortKey) -> TestSortState {
        self.sort_state = request_sort(self.tests.as_mut(), self.sort_state, key);
        self.render();
        self.sort_state
    }

    /// Drill into one test of the loaded list and fetch the files it covers.
    ///
    /// `scroll_offset` is the test list position to restore on re-render. The
    /// previous selection is dropped before the request is sent, so a failed
    /// request leaves nothing selected.
    pub async fn select_test(
        &mut self,
        test_id: &TestId,
        scroll_offset: u32,
    ) -> RepositoryResult<&[CoveredFile]> {
        let test = self
            .tests
            .as_ref()
            .and_then(|tests| tests.iter().find(|t| &t.id == test_id))
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Test {} is not in the loaded test list", test_id),
                    ErrorContext::new("select_test")
                        .with_entity("test")
                        .with_entity_id(test_id),
                )
            })?;

        self.tests_scroll = scroll_offset;
        self.selected = None;
        let covered_files = fetch_covered_files(self.ctx.repo.as_ref(), test_id).await?;
        debug!("Selected test {} ({} covered files)", test.name, covered_files.len());

        self.selected = Some(SelectedTest {
            test,
            covered_files,
        });
        self.render();
        Ok(self.covered_files())
    }

    /// Re-fetch the catalog and measures, merging into the current map.
    pub async fn refresh_measures(&mut self) -> RepositoryResult<()> {
        let measures = fetch_display_measures(
            self.ctx.repo.as_ref(),
            &self.component.key,
            &self.measures.measures,
            self.ctx.options.metrics_page_size,
            self.ctx.formatter.as_ref(),
        )
        .await?;
        self.measures = measures;
        self.render();
        Ok(())
    }

    /// Snapshot of everything the rendering layer draws.
    pub fn view_model(&self) -> OverlayViewModel {
        OverlayViewModel {
            component: self.component.clone(),
            measures: self.measures.measures.clone(),
            derived: self.measures.derived.clone(),
            measures_to_display: self.measures.groups.clone(),
            issues: self.issues.clone(),
            tests: self.tests.clone(),
            test_sorting: self.tests.as_ref().map(|_| self.sort_state),
            selected_test: self.selected.as_ref().map(|s| s.test.clone()),
            covered_files: self.covered_files().to_vec(),
            tests_scroll: self.tests_scroll,
        }
    }

    /// Discard the overlay and all its state.
    pub fn close(self) {
        info!("Closing overlay for {}", self.component.key);
    }

    fn render(&self) {
        self.ctx.renderer.render(&self.view_model());
    }
}
