//! Repository trait definitions for the overlay's collaborator requests.
//!
//! Each trait covers one endpoint family of the analysis server. Splitting
//! them keeps implementations and test doubles focused.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`metrics`]: Metric catalog and server health
//! - [`measures`]: Raw measure values per component
//! - [`issues`]: Issue search facets
//! - [`test_results`]: Test listing and per-test coverage
//!
//! # Convenience Trait Bound
//!
//! For code that needs every request, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn open<R: FullRepository + ?Sized>(repo: &R, component: &Component) -> RepositoryResult<()> {
//!     let catalog = repo.fetch_metrics(9999).await?;
//!     let facets = repo.search_issue_facets(&component.id).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod issues;
pub mod measures;
pub mod metrics;
pub mod test_results;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use issues::IssueRepository;
pub use measures::MeasureRepository;
pub use metrics::MetricRepository;
pub use test_results::TestRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all four
/// repository traits.
pub trait FullRepository:
    MetricRepository + MeasureRepository + IssueRepository + TestRepository
{
}

// Blanket implementation: any type implementing all four traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: MetricRepository + MeasureRepository + IssueRepository + TestRepository
{
}
