use serde::{Deserialize, Serialize};

/// One bucket of a facet: a value and the number of matching issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub val: String,
    pub count: u64,
}

impl FacetValue {
    pub fn new(val: impl Into<String>, count: u64) -> Self {
        Self {
            val: val.into(),
            count,
        }
    }
}

/// A named server-computed aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub property: String,
    #[serde(default)]
    pub values: Vec<FacetValue>,
}

/// Response body of the issue search endpoint, reduced to what the overlay reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSearchResult {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

impl IssueSearchResult {
    /// Values of the facet named `property`, if the server returned it.
    pub fn facet(&self, property: &str) -> Option<&[FacetValue]> {
        self.facets
            .iter()
            .find(|facet| facet.property == property)
            .map(|facet| facet.values.as_slice())
    }
}
