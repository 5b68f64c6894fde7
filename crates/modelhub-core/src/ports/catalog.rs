//! Catalog listing port.

use async_trait::async_trait;

use super::api_error::ApiPortResult;
use crate::catalog::QueryState;
use crate::domain::{PageResult, Pipeline};

/// Port trait for the catalog endpoints of the backend.
///
/// The implementation lives in `modelhub-api`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// List the pipelines used as catalog tabs.
    async fn list_pipelines(&self) -> ApiPortResult<Vec<Pipeline>>;

    /// Fetch one page of models for the given query state.
    async fn list_models(&self, query: &QueryState) -> ApiPortResult<PageResult>;
}
