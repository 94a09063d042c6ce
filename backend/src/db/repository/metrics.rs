//! Metric catalog repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::Metric;

/// Access to the metric catalog of the analysis server.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait MetricRepository: Send + Sync {
    /// Check if the analysis server is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the server answers
    /// - `Ok(false)` if it answers but reports itself unavailable
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch the metric catalog in a single page.
    ///
    /// # Arguments
    /// * `page_size` - Page size; must be large enough to hold the whole catalog
    ///
    /// # Returns
    /// * `Ok(Vec<Metric>)` - Every metric, in server order, unfiltered
    /// * `Err(RepositoryError)` - If the request fails
    async fn fetch_metrics(&self, page_size: u32) -> RepositoryResult<Vec<Metric>>;
}
