//! Lifecycle state and the rules derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote status string reported while a download runs.
const REMOTE_IN_PROGRESS: &str = "in_progress";

/// Remote status string reported for a model held in memory.
const REMOTE_LOADED: &str = "loaded";

/// Download state of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Not downloading
    #[default]
    Idle,
    /// A download is running and being polled
    Downloading,
    /// Local size equals remote size
    Completed,
    /// The trigger or a poll failed
    Error,
}

impl DownloadStatus {
    /// Interpret the backend's download status string.
    ///
    /// Only `in_progress` means a download is running; anything else is idle.
    pub fn from_remote(raw: &str) -> Self {
        if raw == REMOTE_IN_PROGRESS {
            Self::Downloading
        } else {
            Self::Idle
        }
    }

    /// Label of the download action for this status.
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Idle => "Download Model",
            Self::Downloading => "Downloading...",
            Self::Completed => "Model Downloaded",
            Self::Error => "Download Failed - Retry?",
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Downloading => "downloading",
            Self::Completed => "completed",
            Self::Error => "error",
        })
    }
}

/// Whether the model is loaded into its inference service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Not in memory
    #[default]
    NotLoaded,
    /// Loaded and serving predictions
    Loaded,
}

impl LoadStatus {
    /// Interpret the backend's load status string.
    pub fn from_remote(raw: &str) -> Self {
        if raw == REMOTE_LOADED {
            Self::Loaded
        } else {
            Self::NotLoaded
        }
    }

    /// Label of the toggle action for this status.
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::NotLoaded => "Load Model",
            Self::Loaded => "Unload Model",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotLoaded => "not_loaded",
            Self::Loaded => "loaded",
        })
    }
}

/// Everything known about one model's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLifecycleState {
    /// Size of the artifact on the hub, 0 until known
    pub remote_size_bytes: u64,
    /// Size of the local artifact, 0 until known
    pub local_size_bytes: u64,
    /// Download state
    pub download_status: DownloadStatus,
    /// Load state
    pub load_status: LoadStatus,
    /// Seconds between local-size polls
    pub poll_interval_seconds: u64,
}

impl ModelLifecycleState {
    /// Fresh state with the given poll interval.
    pub const fn new(poll_interval_seconds: u64) -> Self {
        Self {
            remote_size_bytes: 0,
            local_size_bytes: 0,
            download_status: DownloadStatus::Idle,
            load_status: LoadStatus::NotLoaded,
            poll_interval_seconds,
        }
    }

    /// Predictions are allowed only for a downloaded and loaded model.
    pub fn is_ready_to_predict(&self) -> bool {
        self.download_status == DownloadStatus::Completed && self.load_status == LoadStatus::Loaded
    }

    /// Whether the local artifact matches a known remote size.
    pub const fn sizes_match(&self) -> bool {
        self.remote_size_bytes > 0 && self.local_size_bytes == self.remote_size_bytes
    }

    /// Whether [`download`](super::ModelLifecycleController::download) would start anything.
    ///
    /// Equal sizes block the download even when both are still 0.
    pub fn can_download(&self) -> bool {
        self.local_size_bytes != self.remote_size_bytes
            && self.download_status != DownloadStatus::Downloading
    }

    /// Whether the poll interval can still be changed.
    pub fn can_change_interval(&self) -> bool {
        self.download_status != DownloadStatus::Completed
    }

    /// Download progress in percent, 0 while the remote size is unknown.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.remote_size_bytes == 0 {
            return 0.0;
        }
        self.local_size_bytes as f64 / self.remote_size_bytes as f64 * 100.0
    }

    /// Mark the download completed when the sizes match.
    ///
    /// Returns `true` if the status changed.
    pub fn reconcile(&mut self) -> bool {
        if self.sizes_match() && self.download_status != DownloadStatus::Completed {
            self.download_status = DownloadStatus::Completed;
            return true;
        }
        false
    }
}
