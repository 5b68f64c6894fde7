//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use modelhub_api::API_BASE_URL_ENV;

use crate::commands::Commands;

/// Command-line interface for browsing and running catalog models.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "modelhub")]
#[command(about = "Browse, download, load and run models from a modelhub backend")]
#[command(version)]
pub struct Cli {
    /// Backend origin (e.g. http://localhost:3001)
    #[arg(long = "api-url", global = true, env = API_BASE_URL_ENV)]
    pub api_url: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log filter directive for the chosen verbosity.
    pub const fn log_directive(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "modelhub",
            "--verbose",
            "--api-url",
            "http://10.0.0.2:3001",
            "browse",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.2:3001"));
        assert_eq!(cli.log_directive(), "debug");
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["modelhub"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_directive(), "warn");
    }
}
