//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use modelhub_core::SortKey;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List catalog models, one page at a time
    Browse(BrowseArgs),

    /// Show a model and drive its download and load state
    Model(ModelArgs),

    /// Run a prediction with a downloaded and loaded model
    Predict(PredictArgs),

    /// Chat with a hosted text-generation model
    Chat(ChatArgs),
}

/// Arguments for `browse`.
#[derive(Args, Debug, Clone, Default)]
pub struct BrowseArgs {
    /// Start from a catalog URL query string (e.g. "pipeline=object-detection&page=2")
    #[arg(long)]
    pub query: Option<String>,
    /// Filter by pipeline tag ("all" for every pipeline)
    #[arg(short, long)]
    pub pipeline: Option<String>,
    /// Sort order: trending, likes, downloads, created, updated
    #[arg(short, long)]
    pub sort: Option<SortKey>,
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
    /// 1-based page number
    #[arg(long)]
    pub page: Option<u32>,
    /// Keep a session open and read navigation commands from the terminal
    #[arg(short, long)]
    pub interactive: bool,
}

/// Arguments for `model`.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Model ID (`organization/name`)
    pub model_id: String,
    /// Pipeline tag of the model (e.g. "image-classification")
    #[arg(short, long)]
    pub pipeline: String,
    /// Start the download and follow it until it completes
    #[arg(long)]
    pub download: bool,
    /// Seconds between download progress polls: 1, 5, 30 or 60
    #[arg(long, value_parser = parse_poll_interval)]
    pub interval: Option<u64>,
    /// Load the model into its inference service
    #[arg(long, conflicts_with = "unload")]
    pub load: bool,
    /// Unload the model from its inference service
    #[arg(long)]
    pub unload: bool,
    /// Print the model card
    #[arg(long)]
    pub card: bool,
}

/// Arguments for `predict`.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Model ID (`organization/name`)
    pub model_id: String,
    /// Pipeline tag of the model
    #[arg(short, long)]
    pub pipeline: String,
    /// Image or audio file to send
    #[arg(long, conflicts_with = "text", required_unless_present = "text")]
    pub file: Option<PathBuf>,
    /// Text to send
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for `chat`.
#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Hosted model name (see --list-models)
    #[arg(short, long, default_value = "Mistral-7B-Instruct")]
    pub model: String,
    /// List the hosted model names and exit
    #[arg(long)]
    pub list_models: bool,
    /// Save this API key before starting
    #[arg(long, env = "MODELHUB_CHAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Nucleus sampling mass
    #[arg(long)]
    pub top_p: Option<f32>,
    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// Random seed (0 lets the service choose)
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_poll_interval(raw: &str) -> Result<u64, String> {
    let seconds: u64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if modelhub_core::lifecycle::POLL_INTERVAL_CHOICES.contains(&seconds) {
        Ok(seconds)
    } else {
        Err("expected one of 1, 5, 30, 60".to_string())
    }
}
