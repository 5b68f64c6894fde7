//! Model command handler.
//!
//! Shows a model's lifecycle state and runs the requested transitions:
//! download (followed with a progress bar until it settles), load and
//! unload.

use anyhow::Result;
use modelhub_core::{
    DownloadError, DownloadStatus, LifecycleConfig, LifecycleEvent, ModelLifecycleController,
    ModelRef,
};
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::commands::ModelArgs;
use crate::error::CliError;
use crate::presentation::{DownloadProgress, print_markdown, render_lifecycle};

/// Parse an `org/name` model id.
pub(crate) fn parse_model_id(model_id: &str) -> Result<ModelRef, CliError> {
    ModelRef::parse(model_id).ok_or_else(|| {
        CliError::Arguments(format!("'{model_id}' is not a model id of the form org/name"))
    })
}

/// Build a controller for `model_id` and fetch its initial state.
pub(crate) async fn open_model(
    ctx: &CliContext,
    model_id: &str,
    pipeline: &str,
    poll_interval: Option<u64>,
) -> Result<ModelLifecycleController, CliError> {
    let model = parse_model_id(model_id)?;
    let mut config = LifecycleConfig::default();
    if let Some(seconds) = poll_interval {
        config.initial_poll_interval_secs = seconds;
    }

    let mut controller =
        ModelLifecycleController::new(ctx.lifecycle(), ctx.predictor(), pipeline, model, &config);
    controller.start().await;
    Ok(controller)
}

/// Execute the model command.
pub async fn execute(ctx: &CliContext, args: ModelArgs) -> Result<()> {
    let mut controller = open_model(ctx, &args.model_id, &args.pipeline, args.interval).await?;

    if args.card {
        print_markdown(controller.model_card());
        println!();
    }

    if args.download {
        if controller.download() {
            follow_download(&mut controller).await?;
        } else {
            println!("Nothing to download.");
        }
    } else if controller.state().download_status == DownloadStatus::Downloading {
        println!("A download is already running; following it.");
        follow_download(&mut controller).await?;
    }

    if args.load {
        controller.load().await.map_err(CliError::from)?;
        println!("Model loaded.");
    } else if args.unload {
        controller.unload().await.map_err(CliError::from)?;
        println!("Model unloaded.");
    }

    println!(
        "{}",
        render_lifecycle(controller.model(), controller.pipeline_tag(), controller.state())
    );
    controller.unmount();
    Ok(())
}

/// Drive the controller until the download completes or fails.
async fn follow_download(controller: &mut ModelLifecycleController) -> Result<(), CliError> {
    let state = controller.state();
    let progress = DownloadProgress::start(
        controller.model(),
        state.local_size_bytes,
        state.remote_size_bytes,
    );

    let mut outcome = Ok(());
    while let Some(event) = controller.next_event().await {
        match event {
            LifecycleEvent::Progress {
                local_size_bytes,
                remote_size_bytes,
            } => progress.update(local_size_bytes, remote_size_bytes),
            LifecycleEvent::TriggerAcknowledged => {}
            LifecycleEvent::DownloadCompleted => {
                let state = controller.state();
                progress.update(state.remote_size_bytes, state.remote_size_bytes);
                break;
            }
            LifecycleEvent::DownloadFailed(err) => {
                warn!(model = %controller.model(), error = %err, "Download failed");
                outcome = Err(match err {
                    DownloadError::Trigger(source) | DownloadError::Poll(source) => {
                        CliError::from(source)
                    }
                });
                break;
            }
        }
    }
    progress.finish();

    if outcome.is_ok() && controller.state().download_status == DownloadStatus::Completed {
        println!("Download complete.");
    }
    outcome
}
