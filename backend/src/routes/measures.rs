use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::api::MetricType;

// =========================================================
// Measures types
// =========================================================

/// Suffix under which the unformatted value of a metric is exposed.
pub const RAW_SUFFIX: &str = "_raw";

/// One measure value as stored in a [`MeasuresMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureValue {
    pub formatted: String,
    pub raw: String,
}

/// Metric key → formatted value, with the raw value kept alongside.
///
/// Both values live in one entry, so a key always has its formatted and raw
/// value together or not at all. Serialization flattens each entry into
/// `<key>` and `<key>_raw` fields for the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasuresMap {
    entries: BTreeMap<String, MeasureValue>,
}

impl MeasuresMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value of `key`.
    pub fn insert(&mut self, key: impl Into<String>, formatted: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(
            key.into(),
            MeasureValue {
                formatted: formatted.into(),
                raw: raw.into(),
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Formatted value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.formatted.as_str())
    }

    /// Unformatted value of `key`, as returned by the server.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.raw.as_str())
    }

    /// Raw value of `key` parsed as a finite number; `None` if absent or not numeric.
    pub fn raw_number(&self, key: &str) -> Option<f64> {
        self.raw(key)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MeasureValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for MeasuresMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() * 2))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &value.formatted)?;
            map.serialize_entry(&format!("{}{}", key, RAW_SUFFIX), &value.raw)?;
        }
        map.end()
    }
}

/// Composite values computed from the merged measures, never stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMeasures {
    /// Sum of the three remediation effort measures, missing ones counting as 0.
    pub issues_remediation_effort: f64,
    /// `lines_to_cover - uncovered_lines`; omitted when either input is missing.
    #[serde(rename = "covered_lines", skip_serializing_if = "Option::is_none")]
    pub covered_lines: Option<f64>,
    /// `conditions_to_cover - uncovered_conditions`; omitted when either input is missing.
    #[serde(rename = "covered_conditions", skip_serializing_if = "Option::is_none")]
    pub covered_conditions: Option<f64>,
}

/// A metric with its formatted value for this component.
///
/// Built fresh for every refresh; the catalog entry it came from is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetric {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub domain: String,
    pub value: String,
}

/// Metrics of one domain, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricGroup {
    pub name: String,
    pub metrics: Vec<DisplayMetric>,
}

/// Output of the measure enrichment step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMeasures {
    pub measures: MeasuresMap,
    pub derived: DerivedMeasures,
    pub groups: Vec<MetricGroup>,
}
