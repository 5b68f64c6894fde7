//! Terminal front-end for modelhub.
//!
//! The binary in `main.rs` parses arguments with [`Cli`], composes the
//! infrastructure in [`bootstrap`] and dispatches to [`handlers`]. Handlers
//! drive the `modelhub-core` controllers and print through
//! [`presentation`].

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;

// Used by the binary only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod store;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
