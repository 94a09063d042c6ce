//! HTTP repository implementation against the analysis server.
//!
//! ## Features
//!
//! - One shared `reqwest::Client` with a request timeout
//! - Automatic retry with exponential backoff for transient failures
//! - Optional bearer token authentication
//! - Request statistics for monitoring
//!
//! Configuration lives in [`crate::db::config::RemoteConfig`].

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::{
    ComponentId, ComponentKey, CoveredFile, IssueSearchResult, Measure, Metric, TestCase, TestId,
};
use crate::db::config::RemoteConfig;
use crate::db::repository::{
    ErrorContext, IssueRepository, MeasureRepository, MetricRepository, RepositoryError,
    RepositoryResult, TestRepository,
};
use crate::models::{CoveredFileList, MetricsPage, TestList};
use crate::routes::issues::{SEVERITIES_FACET, TAGS_FACET, TYPES_FACET};

pub const METRICS_SEARCH_PATH: &str = "/api/metrics/search";
pub const MEASURES_COMPONENT_PATH: &str = "/api/measures/component";
pub const ISSUES_SEARCH_PATH: &str = "/api/issues/search";
pub const TESTS_LIST_PATH: &str = "/api/tests/list";
pub const TESTS_COVERED_FILES_PATH: &str = "/api/tests/covered_files";
pub const SYSTEM_STATUS_PATH: &str = "/api/system/status";

/// Request statistics.
#[derive(Debug, Clone, Default)]
pub struct RemoteStats {
    /// Requests sent, retries included
    pub total_requests: u64,
    /// Operations that failed after their last attempt
    pub failed_requests: u64,
    /// Retry attempts
    pub retried_requests: u64,
}

#[derive(Deserialize)]
struct ComponentMeasures {
    #[serde(default)]
    measures: Vec<Measure>,
}

#[derive(Deserialize)]
struct MeasuresResponse {
    component: ComponentMeasures,
}

#[derive(Deserialize)]
struct SystemStatus {
    status: String,
}

/// Repository backed by the analysis server's web API.
#[derive(Clone, Debug)]
pub struct RemoteRepository {
    http: reqwest::Client,
    config: RemoteConfig,
    // Metrics counters
    total_requests: Arc<AtomicU64>,
    failed_requests: Arc<AtomicU64>,
    retried_requests: Arc<AtomicU64>,
}

impl RemoteRepository {
    /// Create a new repository.
    ///
    /// # Returns
    /// * `Ok(RemoteRepository)` on success
    /// * `Err(RepositoryError)` if the base URL is empty or the client cannot be built
    pub fn new(config: RemoteConfig) -> RepositoryResult<Self> {
        if config.base_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Remote repository requires a base URL",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()
            .map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Failed to build HTTP client: {}", e),
                    ErrorContext::new("create_client"),
                )
            })?;

        Ok(Self {
            http,
            config,
            total_requests: Arc::new(AtomicU64::new(0)),
            failed_requests: Arc::new(AtomicU64::new(0)),
            retried_requests: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Request statistics for monitoring.
    pub fn stats(&self) -> RemoteStats {
        RemoteStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            retried_requests: self.retried_requests.load(Ordering::Relaxed),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// GET `path` and decode the JSON body, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<T> {
        let max_retries = self.config.max_retries;
        let mut retry_delay = Duration::from_millis(self.config.retry_delay_ms);
        let mut last_error = None;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                self.retried_requests.fetch_add(1, Ordering::Relaxed);
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2; // Exponential backoff
            }

            self.total_requests.fetch_add(1, Ordering::Relaxed);
            debug!("GET {} attempt={} query={:?}", path, attempt + 1, query);
            match self.send_once(operation, path, query).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    warn!(
                        "{} failed (attempt {}/{}), retrying: {}",
                        operation,
                        attempt + 1,
                        max_retries + 1,
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    self.failed_requests.fetch_add(1, Ordering::Relaxed);
                    return Err(e.with_operation(operation));
                }
            }
        }

        self.failed_requests.fetch_add(1, Ordering::Relaxed);
        Err(last_error
            .unwrap_or_else(|| RepositoryError::internal("Max retries exceeded with no error captured"))
            .with_operation(operation))
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<T> {
        let mut request = self.http.get(self.url(path)).query(query);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(operation, path, status, body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::decode_with_context(
                e.to_string(),
                ErrorContext::new(operation).with_details(format!("path={}", path)),
            )
        })
    }
}

fn status_error(operation: &str, path: &str, status: StatusCode, body: String) -> RepositoryError {
    let context = ErrorContext::new(operation).with_details(format!("path={} status={}", path, status));
    let message = if body.is_empty() {
        format!("{} returned {}", path, status)
    } else {
        format!("{} returned {}: {}", path, status, body)
    };
    match status {
        StatusCode::NOT_FOUND => RepositoryError::not_found_with_context(message, context),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RepositoryError::timeout_with_context(message, context)
        }
        s if s.is_server_error() => RepositoryError::query_with_context(message, context.retryable()),
        _ => RepositoryError::query_with_context(message, context),
    }
}

#[async_trait]
impl MetricRepository for RemoteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let status: SystemStatus = self
            .get_json("health_check", SYSTEM_STATUS_PATH, &[])
            .await?;
        Ok(status.status == "UP")
    }

    async fn fetch_metrics(&self, page_size: u32) -> RepositoryResult<Vec<Metric>> {
        let page: MetricsPage = self
            .get_json(
                "fetch_metrics",
                METRICS_SEARCH_PATH,
                &[("ps", page_size.to_string())],
            )
            .await?;
        Ok(page.metrics)
    }
}

#[async_trait]
impl MeasureRepository for RemoteRepository {
    async fn fetch_measures(
        &self,
        component: &ComponentKey,
        metric_keys: &[String],
    ) -> RepositoryResult<Vec<Measure>> {
        let response: MeasuresResponse = self
            .get_json(
                "fetch_measures",
                MEASURES_COMPONENT_PATH,
                &[
                    ("componentKey", component.to_string()),
                    ("metricKeys", metric_keys.join(",")),
                ],
            )
            .await?;
        Ok(response.component.measures)
    }
}

#[async_trait]
impl IssueRepository for RemoteRepository {
    async fn search_issue_facets(
        &self,
        component: &ComponentId,
    ) -> RepositoryResult<IssueSearchResult> {
        self.get_json(
            "search_issue_facets",
            ISSUES_SEARCH_PATH,
            &issue_facet_query(component),
        )
        .await
    }
}

#[async_trait]
impl TestRepository for RemoteRepository {
    async fn list_tests(&self, test_file: &ComponentId) -> RepositoryResult<Vec<TestCase>> {
        let list: TestList = self
            .get_json(
                "list_tests",
                TESTS_LIST_PATH,
                &[("testFileId", test_file.to_string())],
            )
            .await?;
        Ok(list.tests)
    }

    async fn covered_files(&self, test: &TestId) -> RepositoryResult<Vec<CoveredFile>> {
        let list: CoveredFileList = self
            .get_json(
                "covered_files",
                TESTS_COVERED_FILES_PATH,
                &[("testId", test.to_string())],
            )
            .await?;
        Ok(list.files)
    }
}

/// Query of the issue facet request: unresolved issues, one-issue page, three facets.
pub(crate) fn issue_facet_query(component: &ComponentId) -> Vec<(&'static str, String)> {
    vec![
        ("componentUuids", component.to_string()),
        ("resolved", "false".to_string()),
        ("ps", "1".to_string()),
        (
            "facets",
            [TYPES_FACET, SEVERITIES_FACET, TAGS_FACET].join(","),
        ),
    ]
}
