//! Data access module for analysis server resources.
//!
//! This module provides abstractions for fetching metrics, measures, issues and
//! tests via the Repository pattern, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (overlay controller, REST API)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (crate::services) - Business Logic        │
//! │  - Measure enrichment and grouping                       │
//! │  - Facet ordering, test sorting                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────┬───────────────────────────────┬─────────────┘
//!             │                               │
//!  ┌──────────▼──────────┐         ┌──────────▼──────────┐
//!  │  Remote Repository  │         │  Local Repository   │
//!  │  (analysis server)  │         │    (in-memory)      │
//!  └─────────────────────┘         └─────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use measures_overlay::db::{RemoteConfig, RepositoryFactory, RepositoryType};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteConfig::from_env()?;
//!     let repo = RepositoryFactory::create(RepositoryType::Remote, Some(&config)).await?;
//!     let metrics = measures_overlay::services::fetch_metrics(repo.as_ref(), 9999).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "remote-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

// ==================== Repository Pattern Exports ====================

pub use config::RemoteConfig;
pub use repo_config::RepositoryConfig;

// Repository traits and implementations
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::{Endpoint, LocalFixture, LocalRepository};
#[cfg(feature = "remote-repo")]
pub use repositories::{RemoteRepository, RemoteStats};
pub use repository::{
    ErrorContext, FullRepository, IssueRepository, MeasureRepository, MetricRepository,
    RepositoryError, RepositoryResult, TestRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository singleton from the environment.
///
/// Calling this more than once keeps the first repository.
pub async fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = RepositoryFactory::from_env()
        .await
        .map_err(|e| anyhow::Error::msg(e.to_string()))
        .context("Failed to create repository from environment")?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Install an already constructed repository as the global instance.
///
/// Returns `false` when a repository was already installed.
pub fn install_repository(repo: Arc<dyn FullRepository>) -> bool {
    REPOSITORY.set(repo).is_ok()
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
