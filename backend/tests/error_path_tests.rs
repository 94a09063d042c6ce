//! Error path testing for db/factory.rs, services/ and db/repository/error.rs
//!
//! These tests trigger error conditions to check how errors propagate from a
//! repository up through the overlay, and what context they carry.

mod support;

use std::sync::Arc;

use measures_overlay::api::{ComponentId, ComponentKey, IssueSearchResult, TestId};
use measures_overlay::db::repository::{ErrorContext, RepositoryError};
use measures_overlay::db::{Endpoint, LocalRepository, MeasureRepository};
use measures_overlay::services::{
    fetch_covered_files, fetch_issue_facets, fetch_tests, DefaultSeverityComparator,
    MeasuresOverlay, OverlayContext,
};

use support::*;

// =========================================================
// Repository Error Tests
// =========================================================

#[tokio::test]
async fn test_unknown_component_measures_not_found() {
    let repo = LocalRepository::new();
    let err = repo
        .fetch_measures(&ComponentKey::from("acme:nope.rs"), &["ncloc".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound { .. }));
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("acme:nope.rs"));
}

#[tokio::test]
async fn test_injected_failures_are_retryable_connection_errors() {
    let repo = seeded_repository();
    repo.fail_endpoint(Endpoint::Tests);
    repo.fail_endpoint(Endpoint::CoveredFiles);

    let err = fetch_tests(&repo, &ComponentId::from("foo-test"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    assert!(err.is_retryable());

    let err = fetch_covered_files(&repo, &TestId::from("t1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));
}

// =========================================================
// Contract Violation Tests
// =========================================================

#[tokio::test]
async fn test_missing_facet_names_the_facet() {
    let repo = LocalRepository::new();
    let mut result = facets(&[("BUG", 1)], &[("MAJOR", 1)], &[]);
    result.facets.retain(|f| f.property != "severities");
    repo.set_issue_facets("c1", result);

    let err = fetch_issue_facets(&repo, &ComponentId::from("c1"), &DefaultSeverityComparator)
        .await
        .unwrap_err();
    assert!(err.is_contract_violation());
    assert_eq!(err.context().details.as_deref(), Some("facet=severities"));
    assert_eq!(err.context().operation.as_deref(), Some("fetch_issue_facets"));
}

#[tokio::test]
async fn test_contract_violation_is_not_retryable() {
    let repo = seeded_repository();
    repo.set_issue_facets("foo", IssueSearchResult::default());

    let err = MeasuresOverlay::open(OverlayContext::new(Arc::new(repo.clone())), foo())
        .await
        .err()
        .unwrap();
    assert!(err.is_contract_violation());
    assert!(!err.is_retryable());
}

// =========================================================
// Error Ordering Tests
// =========================================================

#[tokio::test]
async fn test_measures_error_reported_before_issues_error() {
    let repo = seeded_repository();
    repo.fail_endpoint(Endpoint::Measures);
    repo.set_issue_facets("foo-test", IssueSearchResult::default());

    let err = MeasuresOverlay::open(OverlayContext::new(Arc::new(repo.clone())), foo_test())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    // Tests were still fetched even though the outcome was already decided.
    assert_eq!(repo.call_count(Endpoint::Tests), 1);
}

#[tokio::test]
async fn test_issues_error_reported_before_tests_error() {
    let repo = seeded_repository();
    repo.fail_endpoint(Endpoint::Tests);
    repo.set_issue_facets("foo-test", IssueSearchResult::default());

    let err = MeasuresOverlay::open(OverlayContext::new(Arc::new(repo)), foo_test())
        .await
        .err()
        .unwrap();
    assert!(err.is_contract_violation());
}

// =========================================================
// Error Context Tests
// =========================================================

#[test]
fn test_error_display_includes_context() {
    let err = RepositoryError::not_found_with_context(
        "Overlay abc is not open",
        ErrorContext::new("lookup_overlay")
            .with_entity("overlay")
            .with_entity_id("abc"),
    );
    let text = err.to_string();
    assert!(text.starts_with("Not found: Overlay abc is not open"));
    assert!(text.contains("operation=lookup_overlay"));
    assert!(text.contains("entity=overlay"));
    assert!(text.contains("id=abc"));
}

#[test]
fn test_with_operation_overrides_context() {
    let err = RepositoryError::connection("refused").with_operation("list_tests");
    assert_eq!(err.context().operation.as_deref(), Some("list_tests"));
}

// =========================================================
// Remote Error Tests
// =========================================================

#[cfg(feature = "remote-repo")]
#[tokio::test]
async fn test_unreachable_server_retries_then_fails() {
    use measures_overlay::db::{MetricRepository, RemoteConfig, RepositoryFactory};

    // Port 1 on loopback refuses connections.
    let mut config = RemoteConfig::with_url("http://127.0.0.1:1");
    config.max_retries = 1;
    config.retry_delay_ms = 1;
    config.timeout_sec = 2;
    let remote = RepositoryFactory::create_remote(&config).unwrap();

    let err = remote.fetch_metrics(10).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::ConnectionError { .. } | RepositoryError::TimeoutError { .. }
    ));
    assert_eq!(err.context().operation.as_deref(), Some("fetch_metrics"));

    let stats = remote.stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.retried_requests, 1);
    assert_eq!(stats.failed_requests, 1);
}

#[cfg(feature = "remote-repo")]
#[test]
fn test_remote_requires_base_url() {
    use measures_overlay::db::{RemoteConfig, RemoteRepository};

    let result = RemoteRepository::new(RemoteConfig::default());
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

// =========================================================
// Global Repository Tests
// =========================================================

#[tokio::test]
async fn test_installed_repository_is_returned() {
    let repo = fixture_repository();
    let installed = measures_overlay::db::install_repository(Arc::new(repo));
    assert!(installed);
    assert!(!measures_overlay::db::install_repository(Arc::new(LocalRepository::new())));

    let global = measures_overlay::db::get_repository().unwrap();
    let tests = global
        .list_tests(&ComponentId::from(INVOICE_TEST_ID))
        .await
        .unwrap();
    assert_eq!(tests.len(), 4);
}
