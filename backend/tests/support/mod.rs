#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use measures_overlay::api::{
    Component, CoveredFile, Facet, FacetValue, IssueSearchResult, Measure, Metric, MetricType,
    OverlayViewModel, TestCase, TestStatus,
};
use measures_overlay::db::LocalRepository;
use measures_overlay::services::{OverlayContext, OverlayRenderer};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Environment variables read by the repository factory.
pub const REPOSITORY_ENV: [&str; 4] = [
    "REPOSITORY_TYPE",
    "ANALYSIS_SERVER_URL",
    "ANALYSIS_SERVER_TOKEN",
    "LOCAL_FIXTURE_PATH",
];

/// Runs an async block on a fresh runtime with the repository variables
/// cleared, then `changes` applied.
pub fn with_repository_env<F, Fut, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let mut all: Vec<(&str, Option<&str>)> = REPOSITORY_ENV.iter().map(|k| (*k, None)).collect();
    all.extend_from_slice(changes);
    with_scoped_env(&all, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
            .block_on(f())
    })
}

// =========================================================
// Demo fixture
// =========================================================

pub const INVOICE_KEY: &str = "acme:src/main/java/com/acme/Invoice.java";
pub const INVOICE_ID: &str = "AXa1-invoice";
pub const INVOICE_TEST_KEY: &str = "acme:src/test/java/com/acme/InvoiceTest.java";
pub const INVOICE_TEST_ID: &str = "AXa1-invoice-test";

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/overlay.json")
}

/// Repository seeded from `fixtures/overlay.json`.
pub fn fixture_repository() -> LocalRepository {
    LocalRepository::from_fixture_file(fixture_path()).expect("demo fixture should load")
}

pub fn invoice() -> Component {
    Component::new(INVOICE_KEY, INVOICE_ID)
}

pub fn invoice_test() -> Component {
    Component::new(INVOICE_TEST_KEY, INVOICE_TEST_ID).unit_test()
}

// =========================================================
// Programmatic seeding
// =========================================================

pub fn metric(key: &str, metric_type: MetricType, domain: &str) -> Metric {
    Metric::new(key, key, metric_type, domain)
}

pub fn facets(types: &[(&str, u64)], severities: &[(&str, u64)], tags: &[(&str, u64)]) -> IssueSearchResult {
    let values = |pairs: &[(&str, u64)]| {
        pairs
            .iter()
            .map(|(val, count)| FacetValue::new(*val, *count))
            .collect::<Vec<_>>()
    };
    let total = types.iter().map(|(_, count)| count).sum();
    IssueSearchResult {
        total,
        facets: vec![
            Facet {
                property: "types".to_string(),
                values: values(types),
            },
            Facet {
                property: "severities".to_string(),
                values: values(severities),
            },
            Facet {
                property: "tags".to_string(),
                values: values(tags),
            },
        ],
    }
}

pub fn covered(key: &str) -> CoveredFile {
    CoveredFile {
        key: key.to_string(),
        long_name: key.to_string(),
        covered_lines: None,
    }
}

/// Minimal repository: one source file and one unit-test file with three tests.
pub fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.set_metrics(vec![
        metric("ncloc", MetricType::Int, "Size"),
        metric("lines_to_cover", MetricType::Int, "Coverage"),
        metric("uncovered_lines", MetricType::Int, "Coverage"),
        metric("sqale_index", MetricType::WorkDur, "Maintainability"),
    ]);
    for key in ["p:Foo.java", "p:FooTest.java"] {
        repo.set_measures(
            key,
            vec![
                Measure::new("ncloc", "100"),
                Measure::new("lines_to_cover", "20"),
                Measure::new("uncovered_lines", "5"),
                Measure::new("sqale_index", "90"),
            ],
        );
    }
    repo.set_issue_facets("foo", facets(&[("BUG", 1)], &[("MAJOR", 1)], &[]));
    repo.set_issue_facets("foo-test", facets(&[], &[], &[]));
    repo.set_tests(
        "foo-test",
        vec![
            TestCase::new("t1", "b", TestStatus::Ok).with_duration(30),
            TestCase::new("t2", "a", TestStatus::Error).with_duration(10),
            TestCase::new("t3", "c", TestStatus::Failure).with_duration(20),
        ],
    );
    repo.set_covered_files("t1", vec![covered("p:Foo.java")]);
    repo
}

pub fn foo() -> Component {
    Component::new("p:Foo.java", "foo")
}

pub fn foo_test() -> Component {
    Component::new("p:FooTest.java", "foo-test").unit_test()
}

/// Renderer that records every view it is handed.
#[derive(Default)]
pub struct RecordingRenderer {
    views: Mutex<Vec<OverlayViewModel>>,
}

impl RecordingRenderer {
    pub fn count(&self) -> usize {
        self.views.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<OverlayViewModel> {
        self.views.lock().unwrap().last().cloned()
    }
}

impl OverlayRenderer for RecordingRenderer {
    fn render(&self, view: &OverlayViewModel) {
        self.views.lock().unwrap().push(view.clone());
    }
}

pub fn recording_context(repo: &LocalRepository) -> (OverlayContext, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::default());
    let ctx = OverlayContext::new(Arc::new(repo.clone())).with_renderer(renderer.clone());
    (ctx, renderer)
}

pub fn test_names(view: &OverlayViewModel) -> Vec<String> {
    view.tests
        .as_ref()
        .map(|tests| tests.iter().map(|t| t.name.clone()).collect())
        .unwrap_or_default()
}
