//! Registry of open overlays.
//!
//! Each open overlay gets a random id. Closing an overlay drops its state;
//! nothing survives between two opens of the same component.

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{Component, ComponentKey, OverlayViewModel, TestId, TestSortKey};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::services::overlay::{MeasuresOverlay, OverlayContext};

/// Listing entry for an open overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySummary {
    pub overlay_id: String,
    pub component_key: ComponentKey,
    pub opened_at: DateTime<Utc>,
}

struct OverlayEntry {
    component_key: ComponentKey,
    opened_at: DateTime<Utc>,
    overlay: Arc<Mutex<MeasuresOverlay>>,
}

/// In-memory overlay registry.
///
/// Operations on one overlay are serialized by its own lock, so a drill-down
/// finishes before the next one on the same overlay starts.
#[derive(Clone)]
pub struct OverlayRegistry {
    ctx: OverlayContext,
    overlays: Arc<RwLock<HashMap<String, OverlayEntry>>>,
}

impl OverlayRegistry {
    pub fn new(ctx: OverlayContext) -> Self {
        Self {
            ctx,
            overlays: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn context(&self) -> &OverlayContext {
        &self.ctx
    }

    /// Open an overlay for `component` and return its id with the first view.
    pub async fn open(&self, component: Component) -> RepositoryResult<(String, OverlayViewModel)> {
        let overlay = MeasuresOverlay::open(self.ctx.clone(), component).await?;
        let view = overlay.view_model();

        let overlay_id = Uuid::new_v4().to_string();
        self.overlays.write().insert(
            overlay_id.clone(),
            OverlayEntry {
                component_key: view.component.key.clone(),
                opened_at: Utc::now(),
                overlay: Arc::new(Mutex::new(overlay)),
            },
        );
        info!("Registered overlay {} for {}", overlay_id, view.component.key);
        Ok((overlay_id, view))
    }

    /// Current view of an open overlay.
    pub async fn view(&self, overlay_id: &str) -> RepositoryResult<OverlayViewModel> {
        let overlay = self.lookup(overlay_id)?;
        let guard = overlay.lock().await;
        Ok(guard.view_model())
    }

    pub async fn sort_tests(
        &self,
        overlay_id: &str,
        key: TestSortKey,
    ) -> RepositoryResult<OverlayViewModel> {
        let overlay = self.lookup(overlay_id)?;
        let mut guard = overlay.lock().await;
        guard.sort_tests(key);
        Ok(guard.view_model())
    }

    pub async fn select_test(
        &self,
        overlay_id: &str,
        test_id: &TestId,
        scroll_offset: u32,
    ) -> RepositoryResult<OverlayViewModel> {
        let overlay = self.lookup(overlay_id)?;
        let mut guard = overlay.lock().await;
        guard.select_test(test_id, scroll_offset).await?;
        Ok(guard.view_model())
    }

    /// Close an overlay. Returns `false` if it was not open.
    pub fn close(&self, overlay_id: &str) -> bool {
        let entry = self.overlays.write().remove(overlay_id);
        match entry {
            Some(entry) => {
                match Arc::try_unwrap(entry.overlay) {
                    Ok(overlay) => overlay.into_inner().close(),
                    // An in-flight request still holds it; it is dropped when that finishes.
                    Err(_) => info!("Closed overlay {} while in use", overlay_id),
                }
                true
            }
            None => false,
        }
    }

    /// Open overlays, oldest first. Does not wait on in-flight requests.
    pub fn list(&self) -> Vec<OverlaySummary> {
        let overlays = self.overlays.read();
        let mut summaries: Vec<OverlaySummary> = overlays
            .iter()
            .map(|(id, entry)| OverlaySummary {
                overlay_id: id.clone(),
                component_key: entry.component_key.clone(),
                opened_at: entry.opened_at,
            })
            .collect();
        summaries.sort_by_key(|s| s.opened_at);
        summaries
    }

    pub fn len(&self) -> usize {
        self.overlays.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.read().is_empty()
    }

    fn lookup(&self, overlay_id: &str) -> RepositoryResult<Arc<Mutex<MeasuresOverlay>>> {
        self.overlays
            .read()
            .get(overlay_id)
            .map(|entry| Arc::clone(&entry.overlay))
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Overlay {} is not open", overlay_id),
                    ErrorContext::new("lookup_overlay")
                        .with_entity("overlay")
                        .with_entity_id(overlay_id),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Measure, Metric, MetricType, TestCase, TestStatus};
    use crate::db::{Endpoint, LocalRepository};

    fn registry_with_data() -> (OverlayRegistry, LocalRepository) {
        let repo = LocalRepository::new();
        repo.set_metrics(vec![Metric::new("tests", "Unit tests", MetricType::Int, "Coverage")]);
        repo.set_measures("proj:src/FooTest.java", vec![Measure::new("tests", "2")]);
        repo.set_tests(
            "uuid-test",
            vec![
                TestCase::new("t1", "b", TestStatus::Ok),
                TestCase::new("t2", "a", TestStatus::Failure),
            ],
        );
        let registry = OverlayRegistry::new(OverlayContext::new(Arc::new(repo.clone())));
        (registry, repo)
    }

    fn unit_test_component() -> Component {
        Component::new("proj:src/FooTest.java", "uuid-test").unit_test()
    }

    #[tokio::test]
    async fn test_open_view_close() {
        let (registry, _) = registry_with_data();
        let (id, view) = registry.open(unit_test_component()).await.unwrap();
        assert_eq!(view.tests.as_ref().unwrap().len(), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list()[0].overlay_id, id);

        let again = registry.view(&id).await.unwrap();
        assert_eq!(again.component.key, ComponentKey::from("proj:src/FooTest.java"));

        assert!(registry.close(&id));
        assert!(!registry.close(&id));
        assert!(registry.is_empty());
        assert!(matches!(
            registry.view(&id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_sort_and_select_through_registry() {
        let (registry, repo) = registry_with_data();
        let (id, view) = registry.open(unit_test_component()).await.unwrap();
        let first: Vec<String> = view
            .tests
            .unwrap()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(first, vec!["a", "b"]);

        let sorted = registry.sort_tests(&id, TestSortKey::Name).await.unwrap();
        assert_eq!(sorted.tests.unwrap()[0].name, "a");

        let selected = registry
            .select_test(&id, &TestId::from("t1"), 120)
            .await
            .unwrap();
        assert_eq!(selected.selected_test.unwrap().name, "b");
        assert_eq!(selected.tests_scroll, 120);
        assert_eq!(repo.call_count(Endpoint::CoveredFiles), 1);
    }

    #[tokio::test]
    async fn test_list_includes_overlay_in_use() {
        let (registry, _) = registry_with_data();
        let (id, _) = registry.open(unit_test_component()).await.unwrap();

        let overlay = registry.lookup(&id).unwrap();
        let _guard = overlay.lock().await;
        let listed = registry.list();
        assert_eq!(listed.len(), registry.len());
        assert_eq!(listed[0].overlay_id, id);
        assert_eq!(
            listed[0].component_key,
            ComponentKey::from("proj:src/FooTest.java")
        );
    }

    #[tokio::test]
    async fn test_failed_open_registers_nothing() {
        let (registry, repo) = registry_with_data();
        repo.fail_endpoint(Endpoint::Issues);
        assert!(registry.open(unit_test_component()).await.is_err());
        assert!(registry.is_empty());
    }
}
