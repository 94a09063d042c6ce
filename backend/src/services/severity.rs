//! Ordering of issue severities.

use std::cmp::Ordering;

/// Severities from most to least severe.
pub const SEVERITY_ORDER: [&str; 5] = ["BLOCKER", "CRITICAL", "MAJOR", "MINOR", "INFO"];

/// Total order over severity names.
///
/// Lower ranks sort first. Implementations must give every unknown severity
/// a rank greater than every known one.
pub trait SeverityComparator: Send + Sync {
    fn rank(&self, severity: &str) -> usize;

    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSeverityComparator;

impl SeverityComparator for DefaultSeverityComparator {
    fn rank(&self, severity: &str) -> usize {
        SEVERITY_ORDER
            .iter()
            .position(|s| *s == severity)
            .unwrap_or(SEVERITY_ORDER.len())
    }
}
