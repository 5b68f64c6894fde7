//! Events produced by the list synchronisation loop.

use super::errors::FetchError;
use super::query::QueryState;

/// Something that changed the list view, returned by
/// [`ListSyncController::next_event`](super::ListSyncController::next_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The pipelines (tabs) arrived.
    PipelinesLoaded {
        /// Number of pipelines
        count: usize,
    },

    /// The latest models request succeeded and its page is now displayed.
    PageLoaded {
        /// State the page was fetched for
        state: QueryState,
        /// Total number of matching models
        num_total_items: u64,
        /// Total number of pages
        total_pages: u64,
    },

    /// A fetch failed; the previous data is still displayed.
    FetchFailed(FetchError),

    /// The debounced search draft was committed.
    SearchCommitted {
        /// Committed search text
        search_query: String,
    },

    /// A superseded models response arrived and was dropped.
    StaleDiscarded {
        /// Sequence number of the dropped request
        seq: u64,
    },
}
