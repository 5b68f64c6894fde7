//! Shared CLI presentation utilities.
//!
//! This module provides the display and formatting functions used by the
//! handlers. Renderers return `String`s so they can be tested; printing
//! happens in the handlers.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - State changes belong in the core controllers

pub mod catalog;
pub mod lifecycle;
pub mod markdown;
pub mod prediction;

// Re-export commonly used items
pub use catalog::{format_model_row, render_list, render_pipelines};
pub use lifecycle::{DownloadProgress, render_lifecycle};
pub use markdown::print_markdown;
pub use prediction::render_prediction;

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use modelhub_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// A horizontal separator line.
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}
