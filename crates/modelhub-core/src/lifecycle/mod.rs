//! Per-model lifecycle: download, polling, load/unload and the predict gate.
//!
//! [`ModelLifecycleController`] owns one [`ModelLifecycleState`]. A model
//! can be used for inference only once it is fully downloaded *and* loaded
//! (see [`ModelLifecycleState::is_ready_to_predict`]).

mod controller;
mod errors;
mod events;
mod state;

pub use controller::{
    LifecycleConfig, MAX_POLL_INTERVAL_SECS, ModelLifecycleController, POLL_INTERVAL_CHOICES,
};
pub use errors::{DownloadError, LoadAction, LoadError};
pub use events::LifecycleEvent;
pub use state::{DownloadStatus, LoadStatus, ModelLifecycleState};
