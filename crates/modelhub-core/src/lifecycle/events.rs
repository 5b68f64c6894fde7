//! Events produced by the lifecycle loop.

use super::errors::DownloadError;

/// Something that changed the lifecycle state, returned by
/// [`ModelLifecycleController::next_event`](super::ModelLifecycleController::next_event).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A poll returned a new local size; the download continues.
    Progress {
        /// Local size in bytes
        local_size_bytes: u64,
        /// Remote size in bytes
        remote_size_bytes: u64,
    },

    /// Local size reached the remote size; polling stopped.
    DownloadCompleted,

    /// The trigger or a poll failed; polling stopped.
    DownloadFailed(DownloadError),

    /// The backend answered the download trigger.
    TriggerAcknowledged,
}
