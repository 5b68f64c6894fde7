//! Pipelines, model summaries and paginated results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category of ML task used to filter the catalog (e.g. `image-classification`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline tag, also used as the `pipeline` filter value
    pub id: String,
    /// Human-readable tab label
    pub label: String,
}

impl Pipeline {
    /// Create a new pipeline.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Whether a model author is an organization or an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorKind {
    /// Organization account
    Org,
    /// Individual user account
    #[default]
    User,
}

impl AuthorKind {
    /// Parse the `type` field of an author record. Anything but `org` is a user.
    pub fn from_type(value: &str) -> Self {
        if value.eq_ignore_ascii_case("org") {
            Self::Org
        } else {
            Self::User
        }
    }

    /// Label shown under the model title.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Org => "Organization",
            Self::User => "Individual",
        }
    }
}

/// Author of a model repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    /// Avatar image URL, if any
    pub avatar_url: Option<String>,
    /// Account name
    pub name: String,
    /// Display name, if different from the account name
    pub fullname: Option<String>,
    /// Account kind
    pub kind: AuthorKind,
}

impl Author {
    /// First character of the account name, used when there is no avatar.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

/// One entry of the catalog list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Full model ID (`organization/name`)
    pub id: String,
    /// Pipeline tag the model belongs to
    pub pipeline_tag: String,
    /// Whether the backend can serve this model
    pub available: bool,
    /// Last modification time, when the backend reports a parseable one
    pub last_modified: Option<DateTime<Utc>>,
    /// Total download count
    pub downloads: u64,
    /// Like count
    pub likes: u64,
    /// Repository author
    pub author: Author,
}

impl ModelSummary {
    /// Split the ID into organization and name.
    pub fn model_ref(&self) -> Option<ModelRef> {
        ModelRef::parse(&self.id)
    }
}

/// Response envelope of the models list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageResult {
    /// Models on this page
    pub models: Vec<ModelSummary>,
    /// Number of models matching the query across all pages
    pub num_total_items: u64,
    /// Page size used by the backend
    pub num_items_per_page: u64,
}

impl PageResult {
    /// Number of pages, `ceil(num_total_items / num_items_per_page)`.
    ///
    /// A zero page size yields zero pages.
    pub const fn total_pages(&self) -> u64 {
        if self.num_items_per_page == 0 {
            0
        } else {
            self.num_total_items.div_ceil(self.num_items_per_page)
        }
    }
}

/// Reference to a model by organization and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    /// Owning organization or user
    pub org: String,
    /// Model name
    pub name: String,
}

impl ModelRef {
    /// Create a new model reference.
    pub fn new(org: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
        }
    }

    /// Parse a model reference from an `org/name` string.
    pub fn parse(model_id: &str) -> Option<Self> {
        let (org, name) = model_id.split_once('/')?;
        if org.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(org, name))
    }

    /// Full model ID (`org/name`).
    pub fn id(&self) -> String {
        format!("{}/{}", self.org, self.name)
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.name)
    }
}
