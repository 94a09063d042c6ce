//! Measure enrichment: merge raw measures, derive composite values and group
//! metrics by domain for display.
//!
//! The merge is a pure function of its inputs. Catalog entries are never
//! written to; every refresh builds new [`DisplayMetric`] records.

use log::{debug, error};
use std::collections::{BTreeMap, HashMap};

use crate::api::{
    ComponentKey, DerivedMeasures, DisplayMeasures, DisplayMetric, Measure, MeasuresMap, Metric,
    MetricGroup,
};
use crate::db::repository::{
    ErrorContext, MeasureRepository, MetricRepository, RepositoryError, RepositoryResult,
};
use crate::services::formatting::MeasureFormatter;
use crate::services::metrics::{displayable_metrics, fetch_metrics};

/// Measures summed into `issuesRemediationEffort`.
pub const REMEDIATION_EFFORT_KEYS: [&str; 3] = [
    "sqale_index",
    "reliability_remediation_effort",
    "security_remediation_effort",
];

pub const LINES_TO_COVER: &str = "lines_to_cover";
pub const UNCOVERED_LINES: &str = "uncovered_lines";
pub const CONDITIONS_TO_COVER: &str = "conditions_to_cover";
pub const UNCOVERED_CONDITIONS: &str = "uncovered_conditions";

/// Keys to request measures for: displayable catalog entries, in catalog order.
pub fn metric_keys_to_request(catalog: &[Metric]) -> Vec<String> {
    displayable_metrics(catalog)
        .into_iter()
        .map(|m| m.key.clone())
        .collect()
}

/// Merge `fetched` into a copy of `existing` and build the display structures.
///
/// Each fetched measure must refer to a displayable catalog metric; anything
/// else is returned as a contract violation. Measures without a value are
/// skipped, so their metric stays out of the display groups.
pub fn compute_display_measures(
    existing: &MeasuresMap,
    fetched: &[Measure],
    catalog: &[Metric],
    formatter: &dyn MeasureFormatter,
) -> RepositoryResult<DisplayMeasures> {
    let by_key: HashMap<&str, &Metric> = displayable_metrics(catalog)
        .into_iter()
        .map(|m| (m.key.as_str(), m))
        .collect();

    let mut measures = existing.clone();
    let mut values: HashMap<&str, String> = HashMap::with_capacity(fetched.len());

    for measure in fetched {
        let metric = by_key.get(measure.metric.as_str()).ok_or_else(|| {
            error!(
                "Measure '{}' does not match any displayable metric of the catalog",
                measure.metric
            );
            RepositoryError::contract_with_context(
                format!("Measure for unknown metric '{}'", measure.metric),
                ErrorContext::new("compute_display_measures")
                    .with_entity("metric")
                    .with_entity_id(&measure.metric),
            )
        })?;

        let Some(raw) = measure.value.as_deref() else {
            continue;
        };
        let formatted = formatter.format(raw, &metric.metric_type);
        measures.insert(metric.key.clone(), formatted.clone(), raw);
        values.insert(metric.key.as_str(), formatted);
    }

    let derived = derive_measures(&measures);
    let groups = group_metrics(catalog, &values);
    debug!(
        "Merged {} measures into {} entries, {} display groups",
        fetched.len(),
        measures.len(),
        groups.len()
    );

    Ok(DisplayMeasures {
        measures,
        derived,
        groups,
    })
}

/// Composite values computed from the raw entries of `measures`.
///
/// Idempotent: the result depends only on the raw values present.
pub fn derive_measures(measures: &MeasuresMap) -> DerivedMeasures {
    let issues_remediation_effort = REMEDIATION_EFFORT_KEYS
        .iter()
        .map(|key| measures.raw_number(key).unwrap_or(0.0))
        .sum();

    DerivedMeasures {
        issues_remediation_effort,
        covered_lines: difference(measures, LINES_TO_COVER, UNCOVERED_LINES),
        covered_conditions: difference(measures, CONDITIONS_TO_COVER, UNCOVERED_CONDITIONS),
    }
}

// Not clamped: a negative result is passed through as-is.
fn difference(measures: &MeasuresMap, total: &str, uncovered: &str) -> Option<f64> {
    Some(measures.raw_number(total)? - measures.raw_number(uncovered)?)
}

/// Group the displayable metrics that received a value by domain.
///
/// Groups come out sorted by domain name; metrics keep catalog order.
pub fn group_metrics(catalog: &[Metric], values: &HashMap<&str, String>) -> Vec<MetricGroup> {
    let mut by_domain: BTreeMap<&str, Vec<DisplayMetric>> = BTreeMap::new();

    for metric in displayable_metrics(catalog) {
        let Some(value) = values.get(metric.key.as_str()) else {
            continue;
        };
        by_domain
            .entry(metric.domain.as_str())
            .or_default()
            .push(DisplayMetric {
                key: metric.key.clone(),
                name: metric.name.clone(),
                metric_type: metric.metric_type.clone(),
                domain: metric.domain.clone(),
                value: value.clone(),
            });
    }

    by_domain
        .into_iter()
        .map(|(name, metrics)| MetricGroup {
            name: name.to_string(),
            metrics,
        })
        .collect()
}

/// Fetch the catalog, then the measures of `component`, and merge them.
///
/// The two requests are sequential since the measure keys come from the
/// catalog. No measures request is sent when the catalog has nothing to show.
pub async fn fetch_display_measures<R>(
    repo: &R,
    component: &ComponentKey,
    existing: &MeasuresMap,
    page_size: u32,
    formatter: &dyn MeasureFormatter,
) -> RepositoryResult<DisplayMeasures>
where
    R: MetricRepository + MeasureRepository + ?Sized,
{
    let catalog = fetch_metrics(repo, page_size).await?;
    let keys = metric_keys_to_request(&catalog);

    let fetched = if keys.is_empty() {
        debug!("No displayable metrics, skipping measures request for {}", component);
        Vec::new()
    } else {
        repo.fetch_measures(component, &keys).await?
    };

    compute_display_measures(existing, &fetched, &catalog, formatter)
}
