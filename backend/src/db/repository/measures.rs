//! Measure repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{ComponentKey, Measure};

#[async_trait]
pub trait MeasureRepository: Send + Sync {
    /// Fetch the raw values of `metric_keys` for one component.
    ///
    /// # Arguments
    /// * `component` - Key of the component
    /// * `metric_keys` - Metrics to request; metrics without a value are omitted from the answer
    ///
    /// # Returns
    /// * `Ok(Vec<Measure>)` - At most one measure per requested metric
    /// * `Err(RepositoryError)` - If the request fails
    async fn fetch_measures(
        &self,
        component: &ComponentKey,
        metric_keys: &[String],
    ) -> RepositoryResult<Vec<Measure>>;
}
