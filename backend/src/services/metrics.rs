//! Metric catalog retrieval.

use log::debug;

use crate::api::Metric;
use crate::db::repository::{MetricRepository, RepositoryResult};

/// Fetch the whole metric catalog in one page.
///
/// The catalog is returned as the server sends it; use [`displayable_metrics`]
/// to drop the entries the overlay never shows.
pub async fn fetch_metrics<R: MetricRepository + ?Sized>(
    repo: &R,
    page_size: u32,
) -> RepositoryResult<Vec<Metric>> {
    let metrics = repo.fetch_metrics(page_size).await?;
    debug!("Fetched {} metrics (page size {})", metrics.len(), page_size);
    Ok(metrics)
}

/// Catalog entries eligible for display, in catalog order.
pub fn displayable_metrics(catalog: &[Metric]) -> Vec<&Metric> {
    catalog.iter().filter(|m| m.is_displayable()).collect()
}
