//! The catalog list synchronisation controller.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::errors::FetchError;
use super::events::ListEvent;
use super::query::{QueryState, SortKey};
use crate::domain::{ModelSummary, PageResult, Pipeline};
use crate::ports::{CatalogPort, Navigator, TelemetrySink};

/// Default quiet period before a typed search is committed.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for [`ListSyncController`].
#[derive(Debug, Clone)]
pub struct ListSyncConfig {
    /// Quiet period before the search draft is committed
    pub search_debounce: Duration,
    /// Path reported to telemetry in front of the query string
    pub base_path: String,
}

impl Default for ListSyncConfig {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            base_path: "/".to_string(),
        }
    }
}

/// What the rendering layer shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListView {
    /// Catalog tabs
    pub pipelines: Vec<Pipeline>,
    /// Models on the displayed page
    pub models: Vec<ModelSummary>,
    /// Total number of matching models
    pub num_total_items: u64,
    /// Total number of pages
    pub total_pages: u64,
    /// A models request for the current state is in flight
    pub loading: bool,
    /// Most recent models fetch failure, cleared by the next successful page
    pub last_error: Option<FetchError>,
    /// Pipelines fetch failure, cleared only when the pipelines arrive
    pub pipelines_error: Option<FetchError>,
    /// State the displayed page was fetched for
    pub displayed_state: Option<QueryState>,
}

enum Completion {
    Pipelines(Result<Vec<Pipeline>, FetchError>),
    Models {
        seq: u64,
        state: QueryState,
        result: Result<PageResult, FetchError>,
    },
}

enum Wake {
    Completed(Completion),
    SearchQuiet,
}

/// Owns the catalog [`QueryState`] and keeps the URL, the search box and the
/// displayed page converging on it.
///
/// All mutation happens through `&mut self` on the owning task. Requests are
/// kept as futures inside the controller and only make progress while
/// [`next_event`](Self::next_event) is awaited; dropping the controller
/// drops them.
///
/// Every models request gets a sequence number and only the newest one is
/// applied, so a slow response can never overwrite a newer page.
pub struct ListSyncController {
    catalog: Arc<dyn CatalogPort>,
    navigator: Arc<dyn Navigator>,
    telemetry: Arc<dyn TelemetrySink>,
    config: ListSyncConfig,
    state: QueryState,
    view: ListView,
    search_draft: String,
    debounce: Debouncer,
    latest_seq: u64,
    pipelines_in_flight: bool,
    pipelines_requested: bool,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl ListSyncController {
    /// Create a controller. Nothing is fetched until [`initialize`](Self::initialize).
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        navigator: Arc<dyn Navigator>,
        telemetry: Arc<dyn TelemetrySink>,
        config: ListSyncConfig,
    ) -> Self {
        let debounce = Debouncer::new(config.search_debounce);
        Self {
            catalog,
            navigator,
            telemetry,
            config,
            state: QueryState::default(),
            view: ListView::default(),
            search_draft: String::new(),
            debounce,
            latest_seq: 0,
            pipelines_in_flight: false,
            pipelines_requested: false,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Adopt the state encoded in `url_query` and start fetching.
    ///
    /// Pipelines are requested once per controller. A non-canonical current
    /// location is replaced in place, so normalising adds no history entry.
    pub fn initialize(&mut self, url_query: &str) -> QueryState {
        let state = QueryState::parse(url_query);
        debug!(url_query, ?state, "Initializing catalog state");

        self.search_draft.clone_from(&state.search_query);
        self.debounce.cancel();

        let canonical = state.to_query_string();
        if self.navigator.current_query() != canonical {
            debug!(from = url_query, to = %canonical, "Normalizing catalog location");
            self.navigator.replace_query(&canonical);
        }
        if !self.pipelines_requested {
            self.request_pipelines();
        }
        self.on_state_change(state.clone());
        state
    }

    /// Current query state.
    pub const fn state(&self) -> &QueryState {
        &self.state
    }

    /// Current view.
    pub const fn view(&self) -> &ListView {
        &self.view
    }

    /// Uncommitted contents of the search box.
    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    /// Whether a request or a search commit is still pending.
    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty() || self.debounce.is_armed()
    }

    /// Select a pipeline tab (`None` or `"all"` clears the filter).
    pub fn set_filter(&mut self, pipeline_id: Option<String>) {
        let next = self.state.clone().with_filter(pipeline_id);
        self.transition(next);
    }

    /// Change the sort order.
    pub fn set_sort(&mut self, sort: SortKey) {
        let next = self.state.clone().with_sort(sort);
        self.transition(next);
    }

    /// Commit a search immediately, replacing the draft.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_draft.clone_from(&text);
        self.debounce.cancel();
        self.commit_search(text);
    }

    /// Navigate to another page.
    pub fn set_page(&mut self, page: u32) {
        let next = self.state.clone().with_page(page);
        self.transition(next);
    }

    /// Record a keystroke in the search box.
    ///
    /// The draft changes at once; the committed search follows after the
    /// quiet period unless another keystroke arrives first.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.search_draft = text.into();
        self.debounce.touch();
    }

    /// Commit the draft now (explicit submit).
    pub fn submit_search(&mut self) {
        self.debounce.cancel();
        let draft = self.search_draft.clone();
        self.commit_search(draft);
    }

    /// Re-request the current page, and the pipelines if they never arrived.
    pub fn refresh(&mut self) {
        if self.view.pipelines.is_empty() && !self.pipelines_in_flight {
            self.request_pipelines();
        }
        self.issue_models_fetch();
    }

    /// React to a location change made outside the controller (back/forward).
    ///
    /// Nothing is pushed to the navigator. Returns whether the state changed.
    pub fn location_changed(&mut self, url_query: &str) -> bool {
        let state = QueryState::parse(url_query);
        if state == self.state {
            return false;
        }

        info!(query = %state.to_query_string(), "Catalog location changed externally");
        self.search_draft.clone_from(&state.search_query);
        self.debounce.cancel();
        self.state = state;
        self.report_page_view(&self.state.to_query_string());
        self.issue_models_fetch();
        true
    }

    /// Adopt `state` and run the side effects: push the URL, report the
    /// page view, fetch the page.
    pub fn on_state_change(&mut self, state: QueryState) {
        self.state = state;
        let query = self.state.to_query_string();
        if self.navigator.current_query() != query {
            debug!(%query, "Pushing catalog location");
            self.navigator.push_query(&query);
        }
        self.report_page_view(&query);
        self.issue_models_fetch();
    }

    /// Fetch one page for `state` without touching the controller's view.
    pub async fn fetch_models(&self, state: &QueryState) -> Result<PageResult, FetchError> {
        self.catalog
            .list_models(state)
            .await
            .map_err(FetchError::Models)
    }

    /// Wait for the next completed request or search commit and apply it.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next_event(&mut self) -> Option<ListEvent> {
        let wake = tokio::select! {
            Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                Wake::Completed(completion)
            }
            () = self.debounce.expired(), if self.debounce.is_armed() => Wake::SearchQuiet,
            else => return None,
        };

        let event = match wake {
            Wake::Completed(completion) => self.apply(completion),
            Wake::SearchQuiet => self.commit_draft(),
        };
        Some(event)
    }

    /// Drive [`next_event`](Self::next_event) until nothing is pending.
    pub async fn settle(&mut self) -> Vec<ListEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn transition(&mut self, next: QueryState) {
        if next == self.state {
            debug!("Catalog state unchanged, skipping fetch");
            return;
        }
        self.on_state_change(next);
    }

    fn commit_search(&mut self, text: String) {
        let next = self.state.clone().with_search(text);
        self.transition(next);
    }

    fn commit_draft(&mut self) -> ListEvent {
        self.debounce.cancel();
        let search_query = self.search_draft.clone();
        debug!(%search_query, "Search quiet period elapsed");
        self.commit_search(search_query.clone());
        ListEvent::SearchCommitted { search_query }
    }

    fn report_page_view(&self, query: &str) {
        let page_path = if query.is_empty() {
            self.config.base_path.clone()
        } else {
            format!("{}?{query}", self.config.base_path)
        };
        self.telemetry.page_view(&page_path);
    }

    fn request_pipelines(&mut self) {
        self.pipelines_requested = true;
        self.pipelines_in_flight = true;
        let catalog = Arc::clone(&self.catalog);
        self.in_flight.push(
            async move {
                Completion::Pipelines(
                    catalog
                        .list_pipelines()
                        .await
                        .map_err(FetchError::Pipelines),
                )
            }
            .boxed(),
        );
    }

    fn issue_models_fetch(&mut self) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let state = self.state.clone();
        let catalog = Arc::clone(&self.catalog);

        debug!(seq, query = %state.to_query_string(), "Fetching models");
        self.view.loading = true;
        self.in_flight.push(
            async move {
                let result = catalog
                    .list_models(&state)
                    .await
                    .map_err(FetchError::Models);
                Completion::Models { seq, state, result }
            }
            .boxed(),
        );
    }

    fn apply(&mut self, completion: Completion) -> ListEvent {
        match completion {
            Completion::Pipelines(result) => {
                self.pipelines_in_flight = false;
                match result {
                    Ok(pipelines) => {
                        info!(count = pipelines.len(), "Pipelines loaded");
                        let count = pipelines.len();
                        self.view.pipelines = pipelines;
                        self.view.pipelines_error = None;
                        ListEvent::PipelinesLoaded { count }
                    }
                    Err(error) => {
                        warn!(%error, "Pipelines fetch failed");
                        self.view.pipelines_error = Some(error.clone());
                        ListEvent::FetchFailed(error)
                    }
                }
            }
            Completion::Models { seq, state, result } => {
                if seq != self.latest_seq {
                    debug!(seq, latest = self.latest_seq, "Discarding stale models response");
                    return ListEvent::StaleDiscarded { seq };
                }

                self.view.loading = false;
                match result {
                    Ok(page) => {
                        let total_pages = page.total_pages();
                        let num_total_items = page.num_total_items;
                        debug!(seq, num_total_items, total_pages, "Models page loaded");

                        self.view.models = page.models;
                        self.view.num_total_items = num_total_items;
                        self.view.total_pages = total_pages;
                        self.view.last_error = None;
                        self.view.displayed_state = Some(state.clone());
                        ListEvent::PageLoaded {
                            state,
                            num_total_items,
                            total_pages,
                        }
                    }
                    Err(error) => {
                        warn!(seq, %error, "Models fetch failed, keeping previous page");
                        self.view.last_error = Some(error.clone());
                        ListEvent::FetchFailed(error)
                    }
                }
            }
        }
    }
}
