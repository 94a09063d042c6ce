//! Test results repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{ComponentId, CoveredFile, TestCase, TestId};

#[async_trait]
pub trait TestRepository: Send + Sync {
    /// List the tests of a unit-test file.
    ///
    /// # Returns
    /// * `Ok(Vec<TestCase>)` - Tests in server order
    /// * `Err(RepositoryError)` - If the request fails
    async fn list_tests(&self, test_file: &ComponentId) -> RepositoryResult<Vec<TestCase>>;

    /// List the files covered by one test.
    ///
    /// # Returns
    /// * `Ok(Vec<CoveredFile>)` - Covered files in server order
    /// * `Err(RepositoryError)` - If the request fails
    async fn covered_files(&self, test: &TestId) -> RepositoryResult<Vec<CoveredFile>>;
}
