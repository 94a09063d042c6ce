//! Repository implementations module.
//!
//! This module contains the implementations of the repository traits:
//! - `remote`: HTTP implementation against the analysis server
//! - `local`: In-memory implementation for unit testing and local development

pub mod local;
#[cfg(feature = "remote-repo")]
pub mod remote;

pub use local::{Endpoint, LocalFixture, LocalRepository};
#[cfg(feature = "remote-repo")]
pub use remote::{RemoteRepository, RemoteStats};
