//! Telemetry sink capability.
//!
//! Page views are reported every time the catalog location changes.

use tracing::info;

/// Receiver of page-view events.
pub trait TelemetrySink: Send + Sync {
    /// Record a page view for `page_path` (path plus query string).
    fn page_view(&self, page_path: &str);
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn page_view(&self, _page_path: &str) {}
}

/// Emits page views as `tracing` events under the `modelhub::telemetry` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn page_view(&self, page_path: &str) {
        info!(target: "modelhub::telemetry", page_path, "page view");
    }
}
