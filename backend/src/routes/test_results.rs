use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =========================================================
// Test sorting types
// =========================================================

/// Column the test list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestSortKey {
    Name,
    Duration,
    Status,
}

impl FromStr for TestSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "duration" => Ok(Self::Duration),
            "status" => Ok(Self::Status),
            _ => Err(format!("Unknown test sort key: {}", s)),
        }
    }
}

/// Active sort column and direction of the test list.
///
/// There is one direction flag for the whole list, not one per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSortState {
    pub active_key: TestSortKey,
    pub ascending: bool,
}

impl Default for TestSortState {
    /// Tests open sorted by status, ascending.
    fn default() -> Self {
        Self {
            active_key: TestSortKey::Status,
            ascending: true,
        }
    }
}

impl TestSortState {
    /// State after the user asks to sort by `requested`.
    ///
    /// Requesting the active column flips the direction; any other column
    /// becomes active in ascending order.
    pub fn transition(self, requested: TestSortKey) -> Self {
        if requested == self.active_key {
            Self {
                active_key: self.active_key,
                ascending: !self.ascending,
            }
        } else {
            Self {
                active_key: requested,
                ascending: true,
            }
        }
    }
}
