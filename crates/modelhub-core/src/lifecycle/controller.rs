//! The model lifecycle controller.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use super::errors::{DownloadError, LoadAction, LoadError};
use super::events::LifecycleEvent;
use super::state::{DownloadStatus, LoadStatus, ModelLifecycleState};
use crate::domain::ModelRef;
use crate::ports::{ApiPortResult, ModelLifecyclePort, PredictPort};
use crate::predict::{PredictError, PredictRequest, Prediction};

/// Poll intervals offered to the user, in seconds.
pub const POLL_INTERVAL_CHOICES: [u64; 4] = [1, 5, 30, 60];

/// Longest accepted poll interval, in seconds.
pub const MAX_POLL_INTERVAL_SECS: u64 = 3600;

/// Configuration for [`ModelLifecycleController`].
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Poll interval used until the user picks another one, clamped to
    /// `1..=MAX_POLL_INTERVAL_SECS`
    pub initial_poll_interval_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            initial_poll_interval_secs: POLL_INTERVAL_CHOICES[0],
        }
    }
}

enum Completion {
    Trigger {
        attempt: u64,
        result: ApiPortResult<()>,
    },
    Poll {
        attempt: u64,
        result: ApiPortResult<u64>,
    },
}

enum Wake {
    Completed(Completion),
    PollDue,
}

/// Drives one model through download, load and unload.
///
/// Polling is single-flight: the next local-size request is issued only
/// after the previous one resolved and the interval elapsed. Each download
/// attempt gets a number, and completions from an older attempt are
/// dropped.
///
/// Background work only progresses while [`next_event`](Self::next_event)
/// is awaited. [`unmount`](Self::unmount) or dropping the controller
/// discards it.
pub struct ModelLifecycleController {
    port: Arc<dyn ModelLifecyclePort>,
    predictor: Arc<dyn PredictPort>,
    model: ModelRef,
    pipeline_tag: String,
    state: ModelLifecycleState,
    model_card: String,
    last_load_error: Option<LoadError>,
    attempt: u64,
    poll_in_flight: bool,
    poll_deadline: Option<Instant>,
    unmounted: bool,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl ModelLifecycleController {
    /// Create a controller for `model` served by the `pipeline_tag` service.
    pub fn new(
        port: Arc<dyn ModelLifecyclePort>,
        predictor: Arc<dyn PredictPort>,
        pipeline_tag: impl Into<String>,
        model: ModelRef,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            port,
            predictor,
            model,
            pipeline_tag: pipeline_tag.into(),
            state: ModelLifecycleState::new(
                config
                    .initial_poll_interval_secs
                    .clamp(1, MAX_POLL_INTERVAL_SECS),
            ),
            model_card: String::new(),
            last_load_error: None,
            attempt: 0,
            poll_in_flight: false,
            poll_deadline: None,
            unmounted: false,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Fetch the initial state concurrently and reconcile it.
    ///
    /// A failed fetch is logged and leaves its field at the default. If the
    /// backend reports a running download, polling starts.
    pub async fn start(&mut self) -> &ModelLifecycleState {
        let port = Arc::clone(&self.port);
        let model = &self.model;
        let (download, load, remote, local, card) = tokio::join!(
            port.download_status(model),
            port.load_status(model),
            port.remote_size(model),
            port.local_size(model),
            port.model_card(model),
        );

        match download {
            Ok(raw) => self.state.download_status = DownloadStatus::from_remote(&raw),
            Err(error) => warn!(model = %self.model, %error, "Failed to fetch download status"),
        }
        match load {
            Ok(raw) => self.state.load_status = LoadStatus::from_remote(&raw),
            Err(error) => warn!(model = %self.model, %error, "Failed to fetch load status"),
        }
        match remote {
            Ok(bytes) => self.state.remote_size_bytes = bytes,
            Err(error) => warn!(model = %self.model, %error, "Failed to fetch remote size"),
        }
        match local {
            Ok(bytes) => self.state.local_size_bytes = bytes,
            Err(error) => warn!(model = %self.model, %error, "Failed to fetch local size"),
        }
        match card {
            Ok(markdown) => self.model_card = markdown,
            Err(error) => warn!(model = %self.model, %error, "Failed to fetch model card"),
        }

        self.state.reconcile();
        if self.state.download_status == DownloadStatus::Downloading {
            info!(model = %self.model, "Download already in progress, polling");
            self.attempt += 1;
            self.schedule_poll();
        }

        info!(
            model = %self.model,
            download_status = %self.state.download_status,
            load_status = %self.state.load_status,
            remote_size_bytes = self.state.remote_size_bytes,
            local_size_bytes = self.state.local_size_bytes,
            "Model lifecycle started"
        );
        &self.state
    }

    /// Current state.
    pub const fn state(&self) -> &ModelLifecycleState {
        &self.state
    }

    /// Model this controller drives.
    pub const fn model(&self) -> &ModelRef {
        &self.model
    }

    /// Pipeline tag of the serving inference service.
    pub fn pipeline_tag(&self) -> &str {
        &self.pipeline_tag
    }

    /// Model card markdown, empty until fetched.
    pub fn model_card(&self) -> &str {
        &self.model_card
    }

    /// Most recent failed load or unload, cleared by the next success.
    pub const fn last_load_error(&self) -> Option<&LoadError> {
        self.last_load_error.as_ref()
    }

    /// See [`ModelLifecycleState::is_ready_to_predict`].
    pub fn is_ready_to_predict(&self) -> bool {
        self.state.is_ready_to_predict()
    }

    /// See [`ModelLifecycleState::progress_percent`].
    pub fn progress_percent(&self) -> f64 {
        self.state.progress_percent()
    }

    /// Whether a request or poll timer is pending.
    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty() || self.poll_deadline.is_some()
    }

    /// Start downloading.
    ///
    /// Does nothing (returns `false`) when the sizes already match or a
    /// download is running. From the error state this retries.
    pub fn download(&mut self) -> bool {
        if self.unmounted || !self.state.can_download() {
            debug!(
                model = %self.model,
                download_status = %self.state.download_status,
                "Download not started"
            );
            return false;
        }

        self.attempt += 1;
        let attempt = self.attempt;
        self.state.download_status = DownloadStatus::Downloading;
        info!(model = %self.model, attempt, "Starting download");

        let port = Arc::clone(&self.port);
        let model = self.model.clone();
        self.in_flight.push(
            async move {
                let result = port.trigger_download(&model).await;
                Completion::Trigger { attempt, result }
            }
            .boxed(),
        );

        self.poll_in_flight = false;
        self.schedule_poll();
        true
    }

    /// Change the poll cadence.
    ///
    /// Rejected once the download completed, for 0 and above
    /// [`MAX_POLL_INTERVAL_SECS`]. A pending poll timer
    /// is re-armed with the new interval.
    pub fn set_poll_interval(&mut self, seconds: u64) -> bool {
        if !(1..=MAX_POLL_INTERVAL_SECS).contains(&seconds) || !self.state.can_change_interval() {
            debug!(seconds, "Poll interval change rejected");
            return false;
        }

        self.state.poll_interval_seconds = seconds;
        if self.poll_deadline.is_some() {
            self.schedule_poll();
        }
        debug!(seconds, "Poll interval changed");
        true
    }

    /// Load the model into its inference service.
    pub async fn load(&mut self) -> Result<(), LoadError> {
        self.request_load_state(LoadAction::Load).await
    }

    /// Unload the model from its inference service.
    pub async fn unload(&mut self) -> Result<(), LoadError> {
        self.request_load_state(LoadAction::Unload).await
    }

    /// Load when not loaded, unload otherwise.
    pub async fn toggle_load(&mut self) -> Result<(), LoadError> {
        match self.state.load_status {
            LoadStatus::NotLoaded => self.load().await,
            LoadStatus::Loaded => self.unload().await,
        }
    }

    /// Run one prediction. Refused without a request unless ready.
    pub async fn predict(&self, request: PredictRequest) -> Result<Prediction, PredictError> {
        if self.unmounted || !self.state.is_ready_to_predict() {
            return Err(PredictError::NotReady);
        }

        debug!(model = %self.model, pipeline = %self.pipeline_tag, "Running prediction");
        self.predictor
            .predict(&self.pipeline_tag, request)
            .await
            .map_err(PredictError::Request)
    }

    /// Stop all background work. Nothing issued earlier is applied later.
    pub fn unmount(&mut self) {
        debug!(model = %self.model, pending = self.in_flight.len(), "Unmounting model view");
        self.unmounted = true;
        self.attempt += 1;
        self.poll_deadline = None;
        self.poll_in_flight = false;
        self.in_flight = FuturesUnordered::new();
    }

    /// Wait for the next state change from background work.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next_event(&mut self) -> Option<LifecycleEvent> {
        loop {
            let wake = tokio::select! {
                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    Wake::Completed(completion)
                }
                () = poll_due(self.poll_deadline), if self.poll_deadline.is_some() => Wake::PollDue,
                else => return None,
            };

            match wake {
                Wake::PollDue => self.issue_poll(),
                Wake::Completed(completion) => {
                    if let Some(event) = self.apply(completion) {
                        return Some(event);
                    }
                }
            }
        }
    }

    async fn request_load_state(&mut self, action: LoadAction) -> Result<(), LoadError> {
        if self.unmounted {
            return Err(LoadError::Unmounted);
        }
        if self.state.download_status != DownloadStatus::Completed {
            return Err(LoadError::NotDownloaded);
        }

        let result = match action {
            LoadAction::Load => self.port.load(&self.pipeline_tag, &self.model).await,
            LoadAction::Unload => self.port.unload(&self.pipeline_tag, &self.model).await,
        };

        match result {
            Ok(()) => {
                self.state.load_status = match action {
                    LoadAction::Load => LoadStatus::Loaded,
                    LoadAction::Unload => LoadStatus::NotLoaded,
                };
                self.last_load_error = None;
                info!(model = %self.model, %action, load_status = %self.state.load_status, "Load state changed");
                Ok(())
            }
            Err(source) => {
                warn!(model = %self.model, %action, error = %source, "Load state request failed");
                let error = LoadError::Request { action, source };
                self.last_load_error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn schedule_poll(&mut self) {
        let interval = Duration::from_secs(self.state.poll_interval_seconds);
        self.poll_deadline = Some(Instant::now() + interval);
    }

    fn issue_poll(&mut self) {
        self.poll_deadline = None;
        if self.poll_in_flight {
            return;
        }

        self.poll_in_flight = true;
        let attempt = self.attempt;
        let port = Arc::clone(&self.port);
        let model = self.model.clone();
        debug!(model = %self.model, attempt, "Polling local size");
        self.in_flight.push(
            async move {
                let result = port.local_size(&model).await;
                Completion::Poll { attempt, result }
            }
            .boxed(),
        );
    }

    fn stop_polling(&mut self) {
        self.poll_deadline = None;
        self.poll_in_flight = false;
        // Invalidate a poll that may still be running for this attempt.
        self.attempt += 1;
    }

    fn apply(&mut self, completion: Completion) -> Option<LifecycleEvent> {
        match completion {
            Completion::Trigger { attempt, result } => {
                if attempt != self.attempt {
                    debug!(attempt, current = self.attempt, "Ignoring stale trigger response");
                    return None;
                }
                match result {
                    Ok(()) => {
                        debug!(model = %self.model, "Download trigger acknowledged");
                        Some(LifecycleEvent::TriggerAcknowledged)
                    }
                    Err(error) if self.state.download_status == DownloadStatus::Downloading => {
                        warn!(model = %self.model, %error, "Download trigger failed");
                        self.state.download_status = DownloadStatus::Error;
                        self.stop_polling();
                        Some(LifecycleEvent::DownloadFailed(DownloadError::Trigger(error)))
                    }
                    Err(error) => {
                        warn!(model = %self.model, %error, "Download trigger failed after completion");
                        None
                    }
                }
            }
            Completion::Poll { attempt, result } => {
                if attempt != self.attempt {
                    debug!(attempt, current = self.attempt, "Ignoring stale poll response");
                    return None;
                }
                self.poll_in_flight = false;

                match result {
                    Ok(local_size_bytes) => {
                        self.state.local_size_bytes = local_size_bytes;
                        if self.state.reconcile() {
                            info!(model = %self.model, local_size_bytes, "Download completed");
                            self.poll_deadline = None;
                            return Some(LifecycleEvent::DownloadCompleted);
                        }
                        if self.state.download_status == DownloadStatus::Downloading {
                            self.schedule_poll();
                        }
                        Some(LifecycleEvent::Progress {
                            local_size_bytes,
                            remote_size_bytes: self.state.remote_size_bytes,
                        })
                    }
                    Err(error) => {
                        warn!(model = %self.model, %error, "Local size poll failed");
                        self.state.download_status = DownloadStatus::Error;
                        self.stop_polling();
                        Some(LifecycleEvent::DownloadFailed(DownloadError::Poll(error)))
                    }
                }
            }
        }
    }
}

/// Resolve at `deadline`. Never resolves without one.
async fn poll_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ApiPortError, MockModelLifecyclePort, MockPredictPort};

    fn model() -> ModelRef {
        ModelRef::new("google", "vit-base-patch16-224")
    }

    fn mock_port(remote: u64, local: u64, download: &'static str, load: &'static str) -> MockModelLifecyclePort {
        let mut port = MockModelLifecyclePort::new();
        port.expect_download_status()
            .returning(move |_| Ok(download.to_string()));
        port.expect_load_status().returning(move |_| Ok(load.to_string()));
        port.expect_remote_size().returning(move |_| Ok(remote));
        port.expect_local_size().returning(move |_| Ok(local));
        port.expect_model_card()
            .returning(|_| Ok("# ViT".to_string()));
        port
    }

    fn controller(port: MockModelLifecyclePort, predictor: MockPredictPort) -> ModelLifecycleController {
        ModelLifecycleController::new(
            Arc::new(port),
            Arc::new(predictor),
            "image-classification",
            model(),
            &LifecycleConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_start_reconciles_completed_download() {
        let mut lifecycle = controller(mock_port(100, 100, "idle", "loaded"), MockPredictPort::new());
        let state = lifecycle.start().await.clone();

        assert_eq!(state.download_status, DownloadStatus::Completed);
        assert_eq!(state.load_status, LoadStatus::Loaded);
        assert!(lifecycle.is_ready_to_predict());
        assert_eq!(lifecycle.model_card(), "# ViT");
        assert!(!lifecycle.has_pending());
    }

    #[tokio::test]
    async fn test_start_tolerates_failures() {
        let mut port = MockModelLifecyclePort::new();
        let unavailable = || ApiPortError::Network {
            message: "connection refused".to_string(),
        };
        port.expect_download_status().returning(move |_| Err(unavailable()));
        port.expect_load_status().returning(move |_| Err(unavailable()));
        port.expect_remote_size().returning(|_| Ok(500));
        port.expect_local_size().returning(move |_| Err(unavailable()));
        port.expect_model_card().returning(move |_| Err(unavailable()));

        let mut lifecycle = controller(port, MockPredictPort::new());
        let state = lifecycle.start().await;

        assert_eq!(state.download_status, DownloadStatus::Idle);
        assert_eq!(state.load_status, LoadStatus::NotLoaded);
        assert_eq!(state.remote_size_bytes, 500);
        assert_eq!(state.local_size_bytes, 0);
    }

    #[tokio::test]
    async fn test_download_noop_when_sizes_match() {
        let mut port = mock_port(0, 0, "idle", "not_loaded");
        port.expect_trigger_download().never();

        let mut lifecycle = controller(port, MockPredictPort::new());
        lifecycle.start().await;

        assert!(!lifecycle.download());
        assert_eq!(lifecycle.state().download_status, DownloadStatus::Idle);
        assert!(!lifecycle.has_pending());
    }

    #[tokio::test]
    async fn test_load_refused_before_download() {
        let mut port = mock_port(100, 10, "idle", "not_loaded");
        port.expect_load().never();
        port.expect_unload().never();

        let mut lifecycle = controller(port, MockPredictPort::new());
        lifecycle.start().await;

        assert_eq!(lifecycle.load().await, Err(LoadError::NotDownloaded));
        assert_eq!(lifecycle.unload().await, Err(LoadError::NotDownloaded));
        assert_eq!(lifecycle.state().load_status, LoadStatus::NotLoaded);
    }

    #[tokio::test]
    async fn test_toggle_load() {
        let mut port = mock_port(100, 100, "idle", "not_loaded");
        port.expect_load().times(1).returning(|_, _| Ok(()));
        port.expect_unload().times(1).returning(|_, _| Ok(()));

        let mut lifecycle = controller(port, MockPredictPort::new());
        lifecycle.start().await;

        lifecycle.toggle_load().await.unwrap();
        assert_eq!(lifecycle.state().load_status, LoadStatus::Loaded);
        lifecycle.toggle_load().await.unwrap();
        assert_eq!(lifecycle.state().load_status, LoadStatus::NotLoaded);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_status() {
        let mut port = mock_port(100, 100, "idle", "not_loaded");
        port.expect_load().times(1).returning(|_, _| {
            Err(ApiPortError::Status {
                status: 500,
                url: "http://localhost:3001/api/v1/image-classification/load/google/vit".to_string(),
            })
        });

        let mut lifecycle = controller(port, MockPredictPort::new());
        lifecycle.start().await;

        let err = lifecycle.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Request { action: LoadAction::Load, .. }));
        assert_eq!(lifecycle.state().load_status, LoadStatus::NotLoaded);
        assert_eq!(lifecycle.last_load_error(), Some(&err));
    }

    #[tokio::test]
    async fn test_predict_refused_when_not_ready() {
        let mut predictor = MockPredictPort::new();
        predictor.expect_predict().never();

        let mut lifecycle = controller(mock_port(100, 100, "idle", "not_loaded"), predictor);
        lifecycle.start().await;

        let result = lifecycle
            .predict(PredictRequest::Text {
                text: "hello".to_string(),
            })
            .await;
        assert_eq!(result, Err(PredictError::NotReady));
    }

    #[tokio::test]
    async fn test_predict_forwards_when_ready() {
        let mut predictor = MockPredictPort::new();
        predictor
            .expect_predict()
            .times(1)
            .withf(|pipeline, _| pipeline.to_string() == "image-classification")
            .returning(|_, _| {
                Ok(Prediction::Classification {
                    predicted_class: "tabby cat".to_string(),
                })
            });

        let mut lifecycle = controller(mock_port(100, 100, "idle", "loaded"), predictor);
        lifecycle.start().await;

        let prediction = lifecycle
            .predict(PredictRequest::Image {
                file_name: "cat.jpg".to_string(),
                bytes: vec![0xff, 0xd8],
            })
            .await
            .unwrap();
        assert_eq!(
            prediction,
            Prediction::Classification {
                predicted_class: "tabby cat".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_set_poll_interval_rules() {
        let mut lifecycle = controller(mock_port(100, 10, "idle", "not_loaded"), MockPredictPort::new());
        lifecycle.start().await;

        assert!(!lifecycle.set_poll_interval(0));
        assert!(lifecycle.set_poll_interval(30));
        assert_eq!(lifecycle.state().poll_interval_seconds, 30);

        let mut lifecycle = controller(mock_port(100, 100, "idle", "not_loaded"), MockPredictPort::new());
        lifecycle.start().await;
        assert!(!lifecycle.set_poll_interval(5));
        assert_eq!(lifecycle.state().poll_interval_seconds, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_poll_interval_is_bounded() {
        let mut port = mock_port(100, 10, "idle", "not_loaded");
        port.expect_trigger_download().returning(|_| Ok(()));
        let mut lifecycle = ModelLifecycleController::new(
            Arc::new(port),
            Arc::new(MockPredictPort::new()),
            "image-classification",
            model(),
            &LifecycleConfig {
                initial_poll_interval_secs: u64::MAX,
            },
        );
        lifecycle.start().await;
        assert_eq!(lifecycle.state().poll_interval_seconds, MAX_POLL_INTERVAL_SECS);

        assert!(lifecycle.download());
        assert!(!lifecycle.set_poll_interval(u64::MAX));
        assert!(!lifecycle.set_poll_interval(MAX_POLL_INTERVAL_SECS + 1));
        assert!(lifecycle.set_poll_interval(MAX_POLL_INTERVAL_SECS));
        assert_eq!(
            lifecycle.next_event().await,
            Some(LifecycleEvent::TriggerAcknowledged)
        );
    }
}
