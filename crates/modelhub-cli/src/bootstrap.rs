//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - The HTTP client (via modelhub-api), shared by every port
//! - The preferences store under the user's data directory
//!
//! Command handlers receive the composed [`CliContext`] and build their
//! controllers from its ports.

use std::path::PathBuf;
use std::sync::Arc;

use modelhub_api::{ApiClientConfig, DefaultApiClient};
use modelhub_core::{
    CatalogPort, ChatStreamPort, KeyValueStore, ModelLifecyclePort, PredictPort,
};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;
use crate::store::JsonFileStore;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MODELHUB_DATA_DIR";

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// HTTP client configuration.
    pub api: ApiClientConfig,
    /// Directory holding persisted preferences.
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Build the configuration from the environment and global flags.
    ///
    /// `--api-url` wins over `MODELHUB_API_BASE_URL`.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut api = ApiClientConfig::from_env();
        if let Some(url) = cli.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            api = api.with_base_url(url.trim());
        }

        Ok(Self {
            api,
            data_dir: resolve_data_dir(std::env::var(DATA_DIR_ENV).ok())?,
        })
    }
}

/// Data directory: the override when set, otherwise `<data dir>/modelhub`.
fn resolve_data_dir(override_dir: Option<String>) -> Result<PathBuf, CliError> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join("modelhub"))
        .ok_or_else(|| {
            CliError::Config(format!(
                "cannot determine the data directory; set {DATA_DIR_ENV}"
            ))
        })
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// HTTP client implementing every backend port.
    pub api: Arc<DefaultApiClient>,
    /// Persisted preferences (the chat API key).
    pub store: Arc<dyn KeyValueStore>,
}

impl CliContext {
    /// Catalog port.
    pub fn catalog(&self) -> Arc<dyn CatalogPort> {
        self.api.clone()
    }

    /// Model lifecycle port.
    pub fn lifecycle(&self) -> Arc<dyn ModelLifecyclePort> {
        self.api.clone()
    }

    /// Predict port.
    pub fn predictor(&self) -> Arc<dyn PredictPort> {
        self.api.clone()
    }

    /// Chat streaming port.
    pub fn chat(&self) -> Arc<dyn ChatStreamPort> {
        self.api.clone()
    }

    /// Preferences store.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }
}

/// Bootstrap the CLI application.
///
/// Fails with [`CliError::Config`] when a configured base URL is unusable.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let api = Arc::new(DefaultApiClient::new(&config.api)?);
    debug!(api_root = api.api_root(), data_dir = %config.data_dir.display(), "Bootstrapped CLI");

    Ok(CliContext {
        api,
        store: Arc::new(JsonFileStore::in_dir(&config.data_dir)),
    })
}
