//! Public API surface for the overlay backend.
//!
//! This file consolidates the view-model types handed to the rendering layer
//! and the key newtypes used to address components and tests.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::issues::IssueFacets;
pub use crate::routes::measures::DerivedMeasures;
pub use crate::routes::measures::DisplayMeasures;
pub use crate::routes::measures::DisplayMetric;
pub use crate::routes::measures::MeasuresMap;
pub use crate::routes::measures::MetricGroup;
pub use crate::routes::overlay::OverlayViewModel;
pub use crate::routes::overlay::SelectedTest;
pub use crate::routes::test_results::TestSortKey;
pub use crate::routes::test_results::TestSortState;

pub use crate::models::{
    Component, CoveredFile, Facet, FacetValue, IssueSearchResult, Measure, Metric, MetricType,
    TestCase, TestStatus,
};

crate::define_key_type!(ComponentKey);
crate::define_key_type!(ComponentId);
crate::define_key_type!(TestId);
