//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. Data lives in HashMaps
//! and can be seeded programmatically or from a JSON fixture file.

use async_trait::async_trait;
use log::info;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::api::{
    ComponentId, ComponentKey, CoveredFile, Facet, IssueSearchResult, Measure, Metric, TestCase,
    TestId,
};
use crate::db::repository::*;
use crate::routes::issues::{SEVERITIES_FACET, TAGS_FACET, TYPES_FACET};

/// Endpoint families served by a repository, used for call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Metrics,
    Measures,
    Issues,
    Tests,
    CoveredFiles,
}

impl Endpoint {
    fn index(self) -> usize {
        match self {
            Endpoint::Metrics => 0,
            Endpoint::Measures => 1,
            Endpoint::Issues => 2,
            Endpoint::Tests => 3,
            Endpoint::CoveredFiles => 4,
        }
    }
}

/// In-memory local repository.
///
/// Cloning shares the underlying data, so a test can keep a handle for
/// assertions while the overlay owns another.
///
/// # Example
/// ```
/// use measures_overlay::db::repositories::{Endpoint, LocalRepository};
///
/// let repo = LocalRepository::new();
/// repo.set_metrics(vec![]);
/// assert_eq!(repo.call_count(Endpoint::Tests), 0);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    calls: Arc<[AtomicUsize; 5]>,
}

struct LocalData {
    metrics: Vec<Metric>,
    measures: HashMap<ComponentKey, Vec<Measure>>,
    issues: HashMap<ComponentId, IssueSearchResult>,
    tests: HashMap<ComponentId, Vec<TestCase>>,
    covered_files: HashMap<TestId, Vec<CoveredFile>>,

    // Request inspection
    last_metric_keys: Vec<String>,

    // Failure injection
    failing: HashSet<Endpoint>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            measures: HashMap::new(),
            issues: HashMap::new(),
            tests: HashMap::new(),
            covered_files: HashMap::new(),
            last_metric_keys: Vec::new(),
            failing: HashSet::new(),
            is_healthy: true,
        }
    }
}

/// On-disk dataset understood by [`LocalRepository::from_fixture_file`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFixture {
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub components: Vec<FixtureComponent>,
    #[serde(default)]
    pub covered_files: HashMap<TestId, Vec<CoveredFile>>,
}

/// One component of a [`LocalFixture`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureComponent {
    pub key: ComponentKey,
    pub id: ComponentId,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub issues: Option<IssueSearchResult>,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded from a fixture.
    pub fn from_fixture(fixture: LocalFixture) -> Self {
        let repo = Self::new();
        {
            let mut data = repo.data.write();
            data.metrics = fixture.metrics;
            for component in fixture.components {
                data.measures.insert(component.key, component.measures);
                if let Some(issues) = component.issues {
                    data.issues.insert(component.id.clone(), issues);
                }
                if !component.tests.is_empty() {
                    data.tests.insert(component.id, component.tests);
                }
            }
            data.covered_files = fixture.covered_files;
        }
        repo
    }

    /// Load a JSON fixture file.
    ///
    /// # Returns
    /// * `Ok(LocalRepository)` seeded with the fixture
    /// * `Err(RepositoryError::ConfigurationError)` if the file cannot be read or parsed
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read fixture file {}: {}",
                path.display(),
                e
            ))
        })?;
        let fixture: LocalFixture = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse fixture file {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(
            "Loaded local fixture {} ({} metrics, {} components)",
            path.display(),
            fixture.metrics.len(),
            fixture.components.len()
        );
        Ok(Self::from_fixture(fixture))
    }

    /// Replace the metric catalog.
    pub fn set_metrics(&self, metrics: Vec<Metric>) {
        self.data.write().metrics = metrics;
    }

    /// Replace the measures of a component.
    pub fn set_measures(&self, component: impl Into<ComponentKey>, measures: Vec<Measure>) {
        self.data.write().measures.insert(component.into(), measures);
    }

    /// Replace the issue search answer for a component.
    pub fn set_issue_facets(&self, component: impl Into<ComponentId>, result: IssueSearchResult) {
        self.data.write().issues.insert(component.into(), result);
    }

    /// Replace the tests of a unit-test file.
    pub fn set_tests(&self, test_file: impl Into<ComponentId>, tests: Vec<TestCase>) {
        self.data.write().tests.insert(test_file.into(), tests);
    }

    /// Replace the files covered by a test.
    pub fn set_covered_files(&self, test: impl Into<TestId>, files: Vec<CoveredFile>) {
        self.data.write().covered_files.insert(test.into(), files);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make every request to `endpoint` fail with a connection error.
    pub fn fail_endpoint(&self, endpoint: Endpoint) {
        self.data.write().failing.insert(endpoint);
    }

    /// Undo [`fail_endpoint`](Self::fail_endpoint).
    pub fn restore_endpoint(&self, endpoint: Endpoint) {
        self.data.write().failing.remove(&endpoint);
    }

    /// Number of requests served (or refused) for `endpoint`.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls[endpoint.index()].load(Ordering::SeqCst)
    }

    /// Metric keys of the most recent measures request.
    pub fn last_requested_metric_keys(&self) -> Vec<String> {
        self.data.read().last_metric_keys.clone()
    }

    /// Clear all data and counters, keeping the health status.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
        for counter in self.calls.iter() {
            counter.store(0, Ordering::SeqCst);
        }
    }

    /// Count the call, then fail if the endpoint is down.
    fn enter(&self, endpoint: Endpoint, operation: &str) -> RepositoryResult<()> {
        self.calls[endpoint.index()].fetch_add(1, Ordering::SeqCst);
        let data = self.data.read();
        if !data.is_healthy || data.failing.contains(&endpoint) {
            return Err(RepositoryError::connection_with_context(
                "Analysis server is not reachable",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

fn empty_issue_search() -> IssueSearchResult {
    IssueSearchResult {
        total: 0,
        facets: [TYPES_FACET, SEVERITIES_FACET, TAGS_FACET]
            .iter()
            .map(|property| Facet {
                property: property.to_string(),
                values: Vec::new(),
            })
            .collect(),
    }
}

#[async_trait]
impl MetricRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_metrics(&self, page_size: u32) -> RepositoryResult<Vec<Metric>> {
        self.enter(Endpoint::Metrics, "fetch_metrics")?;
        let data = self.data.read();
        Ok(data.metrics.iter().take(page_size as usize).cloned().collect())
    }
}

#[async_trait]
impl MeasureRepository for LocalRepository {
    async fn fetch_measures(
        &self,
        component: &ComponentKey,
        metric_keys: &[String],
    ) -> RepositoryResult<Vec<Measure>> {
        self.enter(Endpoint::Measures, "fetch_measures")?;
        let mut data = self.data.write();
        data.last_metric_keys = metric_keys.to_vec();

        let measures = data.measures.get(component).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Component {} not found", component),
                ErrorContext::new("fetch_measures")
                    .with_entity("component")
                    .with_entity_id(component),
            )
        })?;

        let requested: HashSet<&str> = metric_keys.iter().map(String::as_str).collect();
        Ok(measures
            .iter()
            .filter(|m| requested.contains(m.metric.as_str()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IssueRepository for LocalRepository {
    async fn search_issue_facets(
        &self,
        component: &ComponentId,
    ) -> RepositoryResult<IssueSearchResult> {
        self.enter(Endpoint::Issues, "search_issue_facets")?;
        let data = self.data.read();
        Ok(data
            .issues
            .get(component)
            .cloned()
            .unwrap_or_else(empty_issue_search))
    }
}

#[async_trait]
impl TestRepository for LocalRepository {
    async fn list_tests(&self, test_file: &ComponentId) -> RepositoryResult<Vec<TestCase>> {
        self.enter(Endpoint::Tests, "list_tests")?;
        let data = self.data.read();
        Ok(data.tests.get(test_file).cloned().unwrap_or_default())
    }

    async fn covered_files(&self, test: &TestId) -> RepositoryResult<Vec<CoveredFile>> {
        self.enter(Endpoint::CoveredFiles, "covered_files")?;
        let data = self.data.read();
        Ok(data.covered_files.get(test).cloned().unwrap_or_default())
    }
}
