//! Display helpers shared by front-ends.

mod format;

pub use format::{format_bytes, format_number, time_ago};
