use crate::api::TestId;
use serde::{Deserialize, Serialize};

/// Outcome of a single test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Ok,
    Failure,
    Error,
    Skipped,
}

impl TestStatus {
    /// Display precedence: errors first, skipped tests last.
    pub fn priority(self) -> u8 {
        match self {
            TestStatus::Error => 0,
            TestStatus::Failure => 1,
            TestStatus::Ok => 2,
            TestStatus::Skipped => 3,
        }
    }
}

/// One test of a unit-test file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: TestId,
    pub name: String,
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered_lines: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl TestCase {
    pub fn new(id: impl Into<TestId>, name: impl Into<String>, status: TestStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            duration_in_ms: None,
            covered_lines: None,
            message: None,
            stacktrace: None,
            file_id: None,
            file_key: None,
            file_name: None,
        }
    }

    pub fn with_duration(mut self, duration_in_ms: u64) -> Self {
        self.duration_in_ms = Some(duration_in_ms);
        self
    }
}

/// Response body of the tests list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestList {
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// A source file exercised by a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveredFile {
    pub key: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered_lines: Option<u64>,
}

/// Response body of the covered files endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoveredFileList {
    #[serde(default)]
    pub files: Vec<CoveredFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority_order() {
        let mut statuses = vec![
            TestStatus::Skipped,
            TestStatus::Ok,
            TestStatus::Error,
            TestStatus::Failure,
        ];
        statuses.sort_by_key(|s| s.priority());
        assert_eq!(
            statuses,
            vec![
                TestStatus::Error,
                TestStatus::Failure,
                TestStatus::Ok,
                TestStatus::Skipped
            ]
        );
    }

    #[test]
    fn test_case_deserializes_server_shape() {
        let json = r#"{
            "id": "AU-TpxcB-iU5OvuD2FL7",
            "name": "should_parse",
            "status": "FAILURE",
            "durationInMs": 12,
            "coveredLines": 3,
            "message": "expected 1 got 2",
            "fileKey": "proj:src/test/ParserTest.java"
        }"#;
        let test: TestCase = serde_json::from_str(json).unwrap();
        assert_eq!(test.id.as_str(), "AU-TpxcB-iU5OvuD2FL7");
        assert_eq!(test.status, TestStatus::Failure);
        assert_eq!(test.duration_in_ms, Some(12));
        assert_eq!(test.covered_lines, Some(3));
        assert!(test.stacktrace.is_none());
    }

    #[test]
    fn test_covered_file_camel_case() {
        let file: CoveredFile =
            serde_json::from_str(r#"{"key":"proj:src/Parser.java","longName":"src/Parser.java","coveredLines":7}"#)
                .unwrap();
        assert_eq!(file.long_name, "src/Parser.java");
        assert_eq!(file.covered_lines, Some(7));
    }
}
