//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the controllers expect from
//! infrastructure. They contain no transport details and use only domain
//! types.
//!
//! # Design Rules
//!
//! - No `reqwest` or `url` types in any signature
//! - Remote calls return [`ApiPortError`] for every failure
//! - Process-wide side channels (URL history, telemetry, persisted keys)
//!   are passed in as capabilities, never reached as globals

mod api_error;
mod catalog;
mod chat;
mod key_value_store;
mod lifecycle;
mod navigator;
mod predict;
mod telemetry;

pub use api_error::{ApiPortError, ApiPortResult};
pub use catalog::CatalogPort;
pub use chat::{ChatStreamPort, DeltaStream};
pub use key_value_store::{KeyValueStore, MemoryKeyValueStore, StoreError};
pub use lifecycle::ModelLifecyclePort;
pub use navigator::{MemoryNavigator, Navigator};
pub use predict::PredictPort;
pub use telemetry::{NoopTelemetry, TelemetrySink, TracingTelemetry};

#[cfg(test)]
pub use catalog::MockCatalogPort;
#[cfg(test)]
pub use lifecycle::MockModelLifecyclePort;
#[cfg(test)]
pub use predict::MockPredictPort;
