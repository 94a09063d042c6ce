//! Issue facet retrieval and ordering.

use log::{debug, error};

use crate::api::{ComponentId, FacetValue, IssueFacets, IssueSearchResult};
use crate::db::repository::{ErrorContext, IssueRepository, RepositoryError, RepositoryResult};
use crate::routes::issues::{ISSUE_TYPE_ORDER, SEVERITIES_FACET, TAGS_FACET, TYPES_FACET};
use crate::services::severity::SeverityComparator;

/// Fetch the unresolved issue facets of `component` and order them for display.
pub async fn fetch_issue_facets<R: IssueRepository + ?Sized>(
    repo: &R,
    component: &ComponentId,
    severities: &dyn SeverityComparator,
) -> RepositoryResult<IssueFacets> {
    let result = repo.search_issue_facets(component).await?;
    debug!(
        "Fetched {} facets ({} issues) for {}",
        result.facets.len(),
        result.total,
        component
    );
    build_issue_facets(&result, severities)
}

/// Extract and order the three facets of an issue search.
///
/// A missing facet is a contract violation; it is never replaced by an empty list.
pub fn build_issue_facets(
    result: &IssueSearchResult,
    severities: &dyn SeverityComparator,
) -> RepositoryResult<IssueFacets> {
    let mut types_facet = required_facet(result, TYPES_FACET)?;
    let mut severities_facet = required_facet(result, SEVERITIES_FACET)?;
    let tags_facet = required_facet(result, TAGS_FACET)?;

    sort_types_facet(&mut types_facet);
    severities_facet.sort_by(|a, b| severities.compare(&a.val, &b.val));

    Ok(IssueFacets {
        types_facet,
        severities_facet,
        tags_facet,
        issues_count: result.total,
    })
}

/// Stable sort by issue kind precedence; unknown kinds keep their order at the end.
pub fn sort_types_facet(values: &mut [FacetValue]) {
    values.sort_by_key(|v| type_rank(&v.val));
}

fn type_rank(kind: &str) -> usize {
    ISSUE_TYPE_ORDER
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(ISSUE_TYPE_ORDER.len())
}

fn required_facet(result: &IssueSearchResult, property: &str) -> RepositoryResult<Vec<FacetValue>> {
    match result.facet(property) {
        Some(values) => Ok(values.to_vec()),
        None => {
            error!("Issue search response has no '{}' facet", property);
            Err(RepositoryError::contract_with_context(
                format!("Missing '{}' facet in issue search response", property),
                ErrorContext::new("fetch_issue_facets").with_details(format!("facet={}", property)),
            ))
        }
    }
}
