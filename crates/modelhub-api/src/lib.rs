//! HTTP adapter for the modelhub backend.
//!
//! [`DefaultApiClient`] implements the `modelhub-core` ports on top of
//! `reqwest`: the catalog, model lifecycle and predict endpoints of the
//! backend, and the streamed chat endpoint of the hosted text-generation
//! service.
//!
//! ```no_run
//! use modelhub_api::{ApiClientConfig, DefaultApiClient};
//!
//! let config = ApiClientConfig::from_env();
//! let client = DefaultApiClient::new(&config)?;
//! # Ok::<(), modelhub_core::ApiPortError>(())
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// DefaultApiClient is meant to be used through the core ports, not its
// internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod sse;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultApiClient;

// Configuration
pub use config::{
    API_BASE_URL_ENV, ApiClientConfig, CHAT_BASE_URL_ENV, DEFAULT_API_BASE_URL,
    DEFAULT_CHAT_BASE_URL,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
