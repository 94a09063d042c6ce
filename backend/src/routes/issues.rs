use serde::{Deserialize, Serialize};

use crate::api::FacetValue;

// =========================================================
// Issue facet types
// =========================================================

/// Facet properties requested from the issue search endpoint.
pub const TYPES_FACET: &str = "types";
pub const SEVERITIES_FACET: &str = "severities";
pub const TAGS_FACET: &str = "tags";

/// Issue kinds in display precedence; other kinds follow in server order.
pub const ISSUE_TYPE_ORDER: [&str; 3] = ["BUG", "VULNERABILITY", "CODE_SMELL"];

/// Aggregated unresolved issue counts for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFacets {
    pub types_facet: Vec<FacetValue>,
    pub severities_facet: Vec<FacetValue>,
    pub tags_facet: Vec<FacetValue>,
    pub issues_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_facets_match_server_names() {
        let facets = [TYPES_FACET, SEVERITIES_FACET, TAGS_FACET].join(",");
        assert_eq!(facets, "types,severities,tags");
    }

    #[test]
    fn test_issue_facets_camel_case() {
        let facets = IssueFacets {
            issues_count: 4,
            ..Default::default()
        };
        let json = serde_json::to_value(&facets).unwrap();
        assert_eq!(json["issuesCount"], 4);
        assert!(json["typesFacet"].as_array().unwrap().is_empty());
    }
}
