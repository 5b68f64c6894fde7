//! Core domain types, ports and client-side controllers for modelhub.
//!
//! The crate holds no transport code. Infrastructure (HTTP, storage,
//! terminal rendering) is plugged in through the traits in [`ports`].
//!
//! - [`catalog`] keeps the catalog query state in sync with a URL query
//!   string and the paginated model list.
//! - [`lifecycle`] drives a single model through download, load and unload,
//!   and gates prediction on readiness.
//! - [`chat`] runs streamed text-generation conversations.

#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod chat;
pub mod domain;
pub mod lifecycle;
pub mod ports;
pub mod predict;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::{
    FetchError, ListEvent, ListSyncConfig, ListSyncController, ListView, QueryState, SortKey,
};
pub use chat::{ChatError, ChatMessage, ChatRole, ChatSession, SamplingParams};
pub use domain::{Author, AuthorKind, ModelRef, ModelSummary, PageResult, Pipeline};
pub use lifecycle::{
    DownloadError, DownloadStatus, LifecycleConfig, LifecycleEvent, LoadError, LoadStatus,
    ModelLifecycleController, ModelLifecycleState,
};
pub use ports::{
    ApiPortError, ApiPortResult, CatalogPort, ChatStreamPort, KeyValueStore, ModelLifecyclePort,
    Navigator, PredictPort, StoreError, TelemetrySink,
};
pub use predict::{PredictError, PredictRequest, Prediction};

#[cfg(test)]
use tokio_test as _;
