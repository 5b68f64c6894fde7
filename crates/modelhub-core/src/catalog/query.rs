//! Catalog query state and its URL query-string encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const KEY_PIPELINE: &str = "pipelineId";
const KEY_SORT: &str = "sort";
const KEY_PAGE: &str = "page";
const KEY_SEARCH: &str = "searchQuery";

/// Pipeline value meaning "no filter".
const ALL_PIPELINES: &str = "all";

/// Sort order of the catalog list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Trending models (default)
    #[default]
    Trending,
    /// Most likes
    Likes,
    /// Most downloads
    Downloads,
    /// Recently created
    Created,
    /// Recently updated
    Updated,
}

impl SortKey {
    /// All sort keys, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Trending,
        Self::Likes,
        Self::Downloads,
        Self::Created,
        Self::Updated,
    ];

    /// Value used in URLs and API requests.
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Likes => "likes",
            Self::Downloads => "downloads",
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }

    /// Menu label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trending => "Trending",
            Self::Likes => "Most likes",
            Self::Downloads => "Most downloads",
            Self::Created => "Recently created",
            Self::Updated => "Recently updated",
        }
    }

    /// Parse a URL/API value.
    pub fn from_param(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_param() == value)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_param(s).ok_or_else(|| {
            format!("unknown sort key '{s}' (expected trending, likes, downloads, created or updated)")
        })
    }
}

/// What the catalog displays: the single source of truth mirrored into the URL.
///
/// Defaults are omitted from the query string, so the default state encodes
/// to `""` and `page=1` is equivalent to no page at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryState {
    /// Pipeline filter; `None` shows all pipelines
    pub pipeline_id: Option<String>,
    /// Sort order
    pub sort: SortKey,
    /// 1-based page number
    pub page: u32,
    /// Committed free-text search
    pub search_query: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            pipeline_id: None,
            sort: SortKey::default(),
            page: 1,
            search_query: String::new(),
        }
    }
}

impl QueryState {
    /// Parse a URL query string (with or without the leading `?`).
    ///
    /// Unknown keys are ignored and malformed values fall back to their
    /// defaults. When a key repeats, the last occurrence wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                KEY_PIPELINE => state.pipeline_id = normalize_pipeline(Some(value.into_owned())),
                KEY_SORT => state.sort = SortKey::from_param(&value).unwrap_or_default(),
                KEY_PAGE => state.page = parse_page(&value),
                KEY_SEARCH => state.search_query = value.into_owned(),
                _ => {}
            }
        }

        state
    }

    /// Encode as a URL query string without the leading `?`.
    ///
    /// Keys are emitted in a fixed order and default values are omitted.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(pipeline) = &self.pipeline_id {
            serializer.append_pair(KEY_PIPELINE, pipeline);
        }
        if self.sort != SortKey::default() {
            serializer.append_pair(KEY_SORT, self.sort.as_param());
        }
        if self.page > 1 {
            serializer.append_pair(KEY_PAGE, &self.page.to_string());
        }
        if !self.search_query.is_empty() {
            serializer.append_pair(KEY_SEARCH, &self.search_query);
        }
        serializer.finish()
    }

    /// Change the pipeline filter. A different filter resets the page.
    #[must_use]
    pub fn with_filter(mut self, pipeline_id: Option<String>) -> Self {
        let pipeline_id = normalize_pipeline(pipeline_id);
        if pipeline_id != self.pipeline_id {
            self.pipeline_id = pipeline_id;
            self.page = 1;
        }
        self
    }

    /// Change the sort order. A different order resets the page.
    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        if sort != self.sort {
            self.sort = sort;
            self.page = 1;
        }
        self
    }

    /// Change the committed search. A different search resets the page.
    #[must_use]
    pub fn with_search(mut self, search_query: impl Into<String>) -> Self {
        let search_query = search_query.into();
        if search_query != self.search_query {
            self.search_query = search_query;
            self.page = 1;
        }
        self
    }

    /// Change the page only. Page 0 is treated as page 1.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

/// Map the "all pipelines" spellings to `None`.
fn normalize_pipeline(pipeline_id: Option<String>) -> Option<String> {
    pipeline_id.filter(|id| !id.is_empty() && id != ALL_PIPELINES)
}

fn parse_page(value: &str) -> u32 {
    value.parse::<u32>().ok().filter(|page| *page >= 1).unwrap_or(1)
}
