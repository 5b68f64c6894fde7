//! Integration tests for `ListSyncController`.
//!
//! The catalog is a scripted fake whose responses can be delayed per search
//! query, so out-of-order completion is reproducible. All tests run on
//! paused tokio time.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use modelhub_core::ports::{ApiPortError, ApiPortResult, MemoryNavigator, Navigator, TelemetrySink};
use modelhub_core::{
    Author, CatalogPort, FetchError, ListEvent, ListSyncConfig, ListSyncController, ModelSummary,
    PageResult, Pipeline, QueryState, SortKey,
};
use tokio::time::Instant;

// ── Fakes ──────────────────────────────────────────────────────────

/// Catalog returning 25 matches (10 per page). Each page holds a single
/// model whose id echoes the search query, so tests can tell pages apart.
#[derive(Default)]
struct ScriptedCatalog {
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<QueryState>>,
}

impl ScriptedCatalog {
    fn delay(&self, search: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(search.to_string(), delay);
    }

    fn fail(&self, search: &str) {
        self.failing.lock().unwrap().insert(search.to_string());
    }

    fn heal(&self, search: &str) {
        self.failing.lock().unwrap().remove(search);
    }

    fn calls(&self) -> Vec<QueryState> {
        self.calls.lock().unwrap().clone()
    }
}

fn model(id: &str) -> ModelSummary {
    ModelSummary {
        id: format!("org/{id}"),
        pipeline_tag: "image-classification".to_string(),
        available: true,
        last_modified: None,
        downloads: 0,
        likes: 0,
        author: Author::default(),
    }
}

#[async_trait]
impl CatalogPort for ScriptedCatalog {
    async fn list_pipelines(&self) -> ApiPortResult<Vec<Pipeline>> {
        Ok(vec![
            Pipeline::new("image-classification", "Image Classification"),
            Pipeline::new("object-detection", "Object Detection"),
        ])
    }

    async fn list_models(&self, query: &QueryState) -> ApiPortResult<PageResult> {
        self.calls.lock().unwrap().push(query.clone());
        let delay = self
            .delays
            .lock()
            .unwrap()
            .get(&query.search_query)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&query.search_query) {
            return Err(ApiPortError::Status {
                status: 500,
                url: "http://localhost:3001/api/v1/models".to_string(),
            });
        }
        Ok(PageResult {
            models: vec![model(&query.search_query)],
            num_total_items: 25,
            num_items_per_page: 10,
        })
    }
}

#[derive(Default)]
struct RecordingTelemetry {
    views: Mutex<Vec<String>>,
}

impl TelemetrySink for RecordingTelemetry {
    fn page_view(&self, page_path: &str) {
        self.views.lock().unwrap().push(page_path.to_string());
    }
}

// ── Helpers ────────────────────────────────────────────────────────

struct Harness {
    catalog: Arc<ScriptedCatalog>,
    navigator: Arc<MemoryNavigator>,
    telemetry: Arc<RecordingTelemetry>,
    list: ListSyncController,
}

fn harness(initial_query: &str) -> Harness {
    let catalog = Arc::new(ScriptedCatalog::default());
    let navigator = Arc::new(MemoryNavigator::new(initial_query));
    let telemetry = Arc::new(RecordingTelemetry::default());
    let list = ListSyncController::new(
        catalog.clone(),
        navigator.clone(),
        telemetry.clone(),
        ListSyncConfig::default(),
    );
    Harness {
        catalog,
        navigator,
        telemetry,
        list,
    }
}

async fn started(initial_query: &str) -> Harness {
    let mut h = harness(initial_query);
    let query = h.navigator.current_query();
    h.list.initialize(&query);
    h.list.settle().await;
    h
}

fn page_loaded(events: &[ListEvent]) -> Vec<&QueryState> {
    events
        .iter()
        .filter_map(|event| match event {
            ListEvent::PageLoaded { state, .. } => Some(state),
            _ => None,
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn initialize_loads_pipelines_and_first_page() {
    let mut h = harness("pipelineId=image-classification&page=2");
    let query = h.navigator.current_query();
    let state = h.list.initialize(&query);
    assert_eq!(state.pipeline_id.as_deref(), Some("image-classification"));
    assert_eq!(state.page, 2);
    assert!(h.list.view().loading);

    let events = h.list.settle().await;
    assert!(events.contains(&ListEvent::PipelinesLoaded { count: 2 }));
    assert!(events.contains(&ListEvent::PageLoaded {
        state: state.clone(),
        num_total_items: 25,
        total_pages: 3,
    }));

    let view = h.list.view();
    assert!(!view.loading);
    assert_eq!(view.pipelines.len(), 2);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.num_total_items, 25);
    assert_eq!(h.navigator.history().len(), 1, "canonical URL was not re-pushed");
}

#[tokio::test(start_paused = true)]
async fn slow_response_for_older_search_is_discarded() {
    let mut h = started("").await;
    h.catalog.delay("a", Duration::from_millis(500));
    h.catalog.delay("b", Duration::from_millis(50));

    h.list.set_search("a");
    h.list.set_search("b");
    let events = h.list.settle().await;

    assert_eq!(
        page_loaded(&events)
            .iter()
            .map(|state| state.search_query.as_str())
            .collect::<Vec<_>>(),
        vec!["b"]
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, ListEvent::StaleDiscarded { .. }))
    );
    assert_eq!(h.list.view().models[0].id, "org/b");
    assert_eq!(h.list.state().search_query, "b");
}

#[tokio::test(start_paused = true)]
async fn typing_commits_once_after_quiet_period() {
    let mut h = started("").await;
    let calls_before = h.catalog.calls().len();

    h.list.type_search("r");
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.list.type_search("re");
    tokio::time::sleep(Duration::from_millis(100)).await;
    h.list.type_search("res");

    assert_eq!(h.list.search_draft(), "res");
    assert_eq!(h.list.state().search_query, "");

    let start = Instant::now();
    let events = h.list.settle().await;
    assert!(start.elapsed() >= Duration::from_millis(300));

    assert_eq!(
        events[0],
        ListEvent::SearchCommitted {
            search_query: "res".to_string()
        }
    );
    let calls = h.catalog.calls();
    assert_eq!(calls.len(), calls_before + 1);
    assert_eq!(calls.last().unwrap().search_query, "res");
    assert_eq!(h.navigator.current_query(), "searchQuery=res");
}

#[tokio::test(start_paused = true)]
async fn submit_search_commits_immediately() {
    let mut h = started("").await;

    h.list.type_search("vit");
    h.list.submit_search();
    assert_eq!(h.list.state().search_query, "vit");

    let events = h.list.settle().await;
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, ListEvent::SearchCommitted { .. }))
    );
    assert_eq!(page_loaded(&events).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn changing_sort_resets_page() {
    let mut h = started("").await;

    h.list.set_page(3);
    h.list.settle().await;
    assert_eq!(h.navigator.current_query(), "page=3");

    h.list.set_sort(SortKey::Downloads);
    h.list.settle().await;
    assert_eq!(h.list.state().page, 1);
    assert_eq!(h.navigator.current_query(), "sort=downloads");

    h.list.set_filter(Some("object-detection".to_string()));
    assert_eq!(
        h.navigator.current_query(),
        "pipelineId=object-detection&sort=downloads"
    );
}

#[tokio::test(start_paused = true)]
async fn identical_transitions_do_nothing() {
    let mut h = started("sort=likes").await;
    let calls_before = h.catalog.calls().len();
    let history_before = h.navigator.history();

    h.list.set_sort(SortKey::Likes);
    h.list.set_page(1);
    h.list.set_filter(None);
    h.list.set_search("");

    assert!(!h.list.has_pending());
    assert_eq!(h.catalog.calls().len(), calls_before);
    assert_eq!(h.navigator.history(), history_before);
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_previous_page_until_refresh() {
    let mut h = started("").await;
    let before = h.list.view().models.clone();

    h.catalog.fail("boom");
    h.list.set_search("boom");
    let events = h.list.settle().await;

    assert!(
        events
            .iter()
            .any(|event| matches!(event, ListEvent::FetchFailed(FetchError::Models(_))))
    );
    assert_eq!(h.list.view().models, before);
    assert!(h.list.view().last_error.is_some());
    assert_eq!(
        h.list.view().displayed_state.as_ref().map(|s| s.search_query.as_str()),
        Some("")
    );

    h.catalog.heal("boom");
    h.list.refresh();
    h.list.settle().await;
    assert_eq!(h.list.view().models[0].id, "org/boom");
    assert!(h.list.view().last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn back_navigation_refetches_without_pushing() {
    let mut h = started("").await;

    h.list.set_page(2);
    h.list.settle().await;
    assert_eq!(h.navigator.history(), vec![String::new(), "page=2".to_string()]);

    let previous = h.navigator.back().unwrap();
    assert!(h.list.location_changed(&previous));
    let events = h.list.settle().await;

    assert_eq!(h.list.state(), &QueryState::default());
    assert_eq!(page_loaded(&events).len(), 1);
    assert_eq!(h.navigator.history(), vec![String::new()]);
    assert!(!h.list.location_changed(""));
}

#[tokio::test(start_paused = true)]
async fn page_views_follow_state_changes() {
    let mut h = started("").await;
    h.list.set_sort(SortKey::Likes);
    h.list.set_page(2);
    h.list.settle().await;

    assert_eq!(
        *h.telemetry.views.lock().unwrap(),
        vec![
            "/".to_string(),
            "/?sort=likes".to_string(),
            "/?sort=likes&page=2".to_string(),
        ]
    );
}
