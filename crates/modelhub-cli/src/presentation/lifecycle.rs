//! Model lifecycle rendering: status lines and the download progress bar.

use std::fmt::Write as _;
use std::time::Duration;

use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use modelhub_core::utils::format_bytes;
use modelhub_core::{DownloadStatus, LoadStatus, ModelLifecycleState, ModelRef};

/// Status block shown by `model`.
pub fn render_lifecycle(model: &ModelRef, pipeline_tag: &str, state: &ModelLifecycleState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{model}  ({pipeline_tag})");
    let _ = writeln!(
        out,
        "  Size:      {} of {} on disk ({:.1}%)",
        format_bytes(state.local_size_bytes),
        format_bytes(state.remote_size_bytes),
        state.progress_percent()
    );
    let _ = writeln!(out, "  Download:  {}", download_label(state.download_status));
    let _ = writeln!(out, "  Load:      {}", load_label(state.load_status));
    let _ = write!(
        out,
        "  Predict:   {}",
        if state.is_ready_to_predict() {
            "ready"
        } else {
            "not ready (download and load the model first)"
        }
    );
    out
}

const fn download_label(status: DownloadStatus) -> &'static str {
    match status {
        DownloadStatus::Idle => "not downloaded",
        DownloadStatus::Downloading => "downloading",
        DownloadStatus::Completed => "completed",
        DownloadStatus::Error => "failed (retry with --download)",
    }
}

const fn load_label(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::NotLoaded => "not loaded",
        LoadStatus::Loaded => "loaded",
    }
}

// ============================================================================
// Download Progress (indicatif)
// ============================================================================

/// Terminal progress bar following local/remote size updates.
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// Show a bar for `model` starting at `local` of `remote` bytes.
    pub fn start(model: &ModelRef, local: u64, remote: u64) -> Self {
        let bar = ProgressBar::with_draw_target(Some(remote), ProgressDrawTarget::stdout());
        bar.set_style(Self::bar_style());
        bar.set_message(model.to_string());
        bar.set_position(local.min(remote));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Apply a size update.
    pub fn update(&self, local: u64, remote: u64) {
        if self.bar.length() != Some(remote) {
            self.bar.set_length(remote);
        }
        self.bar.set_position(local.min(remote));
    }

    /// Finish and clear the progress display.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{msg} {bar:28.cyan/blue} {human_bytes:>9} / {human_total:>9} ({percent:>3}%) {spinner}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("human_bytes", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{}", HumanBytes(state.pos()));
        })
        .with_key("human_total", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let value = state
                .len()
                .map_or_else(|| "?".to_string(), |len| HumanBytes(len).to_string());
            let _ = write!(w, "{value}");
        })
    }
}
