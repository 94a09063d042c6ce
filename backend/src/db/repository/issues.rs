//! Issue search repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{ComponentId, IssueSearchResult};

#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Search unresolved issues of a component for their facets only.
    ///
    /// Implementations request `resolved=false`, a page size of 1 and the
    /// `types,severities,tags` facets; the issue list itself is not needed.
    ///
    /// # Returns
    /// * `Ok(IssueSearchResult)` - Total count and raw facets, in server order
    /// * `Err(RepositoryError)` - If the request fails
    async fn search_issue_facets(&self, component: &ComponentId)
        -> RepositoryResult<IssueSearchResult>;
}
