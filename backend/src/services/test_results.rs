//! Test list retrieval and ordering.

use log::debug;
use std::cmp::Ordering;

use crate::api::{ComponentId, TestCase, TestSortKey, TestSortState};
use crate::db::repository::{RepositoryResult, TestRepository};

/// Fetch the tests of a unit-test file, in the default order.
///
/// The default order is by status priority (errors first), then by name.
pub async fn fetch_tests<R: TestRepository + ?Sized>(
    repo: &R,
    test_file: &ComponentId,
) -> RepositoryResult<Vec<TestCase>> {
    let mut tests = repo.list_tests(test_file).await?;
    debug!("Fetched {} tests for {}", tests.len(), test_file);
    sort_tests(Some(&mut tests), TestSortState::default());
    Ok(tests)
}

/// Compare two tests on one column, ascending.
///
/// `Status` compares `(status priority, name)`, computed on every call.
/// A test without a duration sorts before any test with one.
pub fn compare_tests(a: &TestCase, b: &TestCase, key: TestSortKey) -> Ordering {
    match key {
        TestSortKey::Name => a.name.cmp(&b.name),
        TestSortKey::Duration => a.duration_in_ms.cmp(&b.duration_in_ms),
        TestSortKey::Status => (a.status.priority(), &a.name).cmp(&(b.status.priority(), &b.name)),
    }
}

/// Stable sort of `tests` according to `state`.
///
/// Does nothing when there is no test list.
pub fn sort_tests(tests: Option<&mut Vec<TestCase>>, state: TestSortState) {
    let Some(tests) = tests else {
        return;
    };
    tests.sort_by(|a, b| {
        let ordering = compare_tests(a, b, state.active_key);
        if state.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Handle a user request to sort by `key`.
///
/// Returns the state after the request. Without a test list the request is
/// ignored and `state` is returned unchanged.
pub fn request_sort(
    tests: Option<&mut Vec<TestCase>>,
    state: TestSortState,
    key: TestSortKey,
) -> TestSortState {
    let Some(tests) = tests else {
        return state;
    };
    let next = state.transition(key);
    sort_tests(Some(&mut *tests), next);
    debug!(
        "Sorted {} tests by {:?} ({})",
        tests.len(),
        next.active_key,
        if next.ascending { "asc" } else { "desc" }
    );
    next
}
