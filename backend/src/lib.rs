//! # Measures Overlay Backend
//!
//! Aggregation core of the source viewer's measures overlay.
//!
//! Given a file component, the crate gathers metric measures, unresolved issue
//! facets and (for unit-test files) per-test results from an analysis server,
//! merges and derives composite metrics, groups them for display, and supports
//! re-sorting the test list and drilling into the files covered by one test.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: View-model types handed to the rendering layer
//! - [`models`]: Data shapes returned by the analysis server
//! - [`db`]: Repository pattern over the analysis server (remote) or memory (local)
//! - [`services`]: Measure enrichment, facet ordering, test sorting and the overlay controller
//! - [`http`]: Axum-based HTTP server exposing overlay sessions
//! - [`routes`]: View-model type definitions
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use measures_overlay::api::Component;
//! use measures_overlay::db::RepositoryFactory;
//! use measures_overlay::services::{MeasuresOverlay, OverlayContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = RepositoryFactory::from_env().await?;
//! let ctx = OverlayContext::new(repo);
//! let overlay = MeasuresOverlay::open(ctx, Component::new("proj:src/Foo.java", "AX1")).await?;
//! println!("{}", serde_json::to_string_pretty(&overlay.view_model())?);
//! # Ok(())
//! # }
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
