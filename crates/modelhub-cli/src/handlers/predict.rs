//! Predict command handler.

use std::path::Path;

use anyhow::Result;
use modelhub_core::PredictRequest;
use tracing::debug;

use super::model::open_model;
use crate::bootstrap::CliContext;
use crate::commands::PredictArgs;
use crate::error::CliError;
use crate::presentation::render_prediction;

const SPEECH_PIPELINE: &str = "automatic-speech-recognition";
const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "mp3", "flac", "ogg", "m4a", "webm"];

/// Wrap file contents as an image or audio input.
///
/// Speech pipelines and audio extensions send audio; everything else is an
/// image.
fn file_request(pipeline: &str, path: &Path, bytes: Vec<u8>) -> PredictRequest {
    let file_name = path
        .file_name()
        .map_or_else(|| "input".to_string(), |n| n.to_string_lossy().into_owned());
    let is_audio = pipeline == SPEECH_PIPELINE
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

    if is_audio {
        PredictRequest::Audio { file_name, bytes }
    } else {
        PredictRequest::Image { file_name, bytes }
    }
}

/// Execute the predict command.
pub async fn execute(ctx: &CliContext, args: PredictArgs) -> Result<()> {
    let request = match (&args.file, args.text) {
        (Some(path), _) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            debug!(path = %path.display(), len = bytes.len(), "Read prediction input");
            file_request(&args.pipeline, path, bytes)
        }
        (None, Some(text)) => PredictRequest::Text { text },
        (None, None) => {
            return Err(CliError::Arguments("either --file or --text is required".to_string()).into());
        }
    };

    let mut controller = open_model(ctx, &args.model_id, &args.pipeline, None).await?;
    let prediction = controller.predict(request).await.map_err(CliError::from);
    controller.unmount();

    println!("{}", render_prediction(&prediction?));
    Ok(())
}
