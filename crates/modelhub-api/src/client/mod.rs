//! Client for the modelhub backend and the hosted chat service.
//!
//! Endpoint groups live in submodules; each adds an `impl` block returning
//! internal [`ApiResult`](crate::error::ApiResult)s. The port traits of
//! `modelhub-core` are implemented in `port.rs`.

mod catalog;
mod chat;
mod lifecycle;
mod predict;

use modelhub_core::ApiPortError;

use crate::config::ApiClientConfig;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::ApiConfig;
use crate::port::map_error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default client using the reqwest HTTP backend.
pub type DefaultApiClient = ApiClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the modelhub backend API.
///
/// This client is generic over an HTTP backend, allowing for easy testing.
/// Use `DefaultApiClient` for production code and interact with it through
/// the port traits (`CatalogPort`, `ModelLifecyclePort`, `PredictPort`,
/// `ChatStreamPort`).
pub struct ApiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: ApiConfig,
}

impl DefaultApiClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails with `ApiPortError::Configuration` when a base URL is unusable.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiPortError> {
        let internal_config = ApiConfig::from_public(config).map_err(map_error)?;
        let backend = ReqwestBackend::new(&internal_config).map_err(map_error)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }

    /// Backend endpoint root, for display.
    pub fn api_root(&self) -> &str {
        self.config.api_root.as_str()
    }
}

impl<B: HttpBackend> ApiClient<B> {
    /// Create a new client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: ApiConfig, backend: B) -> Self {
        Self { backend, config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_creation() {
        let client = DefaultApiClient::new(&ApiClientConfig::new()).unwrap();
        assert_eq!(client.api_root(), "http://localhost:3001/api/v1");
    }

    #[test]
    fn test_bad_base_url_is_configuration_error() {
        let config = ApiClientConfig::new().with_base_url("localhost");
        assert!(matches!(
            DefaultApiClient::new(&config),
            Err(ApiPortError::Configuration { .. })
        ));
    }
}
