//! Metric catalog and raw measure shapes returned by the analysis server.

use serde::{Deserialize, Serialize};

/// Value type of a metric, which drives formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Int,
    Float,
    Percent,
    Bool,
    String,
    Millisec,
    Data,
    Level,
    Distrib,
    Rating,
    WorkDur,
    /// Any type this crate does not know how to format.
    #[serde(other)]
    Unknown,
}

/// Definition of a measurable property.
///
/// Identity is the `key`; two metrics with the same key describe the same
/// property regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub hidden: bool,
}

impl Metric {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        metric_type: MetricType,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            metric_type,
            domain: domain.into(),
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// `DATA` metrics and hidden metrics never reach the overlay.
    pub fn is_displayable(&self) -> bool {
        self.metric_type != MetricType::Data && !self.hidden
    }
}

/// Raw value of one metric for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl Measure {
    pub fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: Some(value.into()),
        }
    }
}

/// Response body of the metrics catalog endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsPage {
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub total: Option<u64>,
}
