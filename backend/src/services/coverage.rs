//! Files covered by a single test.

use log::debug;

use crate::api::{CoveredFile, TestId};
use crate::db::repository::{RepositoryResult, TestRepository};

pub async fn fetch_covered_files<R: TestRepository + ?Sized>(
    repo: &R,
    test: &TestId,
) -> RepositoryResult<Vec<CoveredFile>> {
    let files = repo.covered_files(test).await?;
    debug!("Test {} covers {} files", test, files.len());
    Ok(files)
}
