//! CLI entry point.
//!
//! Parses arguments, wires the infrastructure via [`bootstrap`] and routes
//! each command to its handler. A [`CliError`] anywhere in the chain maps
//! to its sysexits-style exit code.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use modelhub_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(err) = run(&cli, command).await {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
    Ok(())
}

async fn run(cli: &Cli, command: Commands) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(cli)?;
    let ctx = bootstrap(config)?;

    match command {
        Commands::Browse(args) => handlers::browse::execute(&ctx, args).await,
        Commands::Model(args) => handlers::model::execute(&ctx, args).await,
        Commands::Predict(args) => handlers::predict::execute(&ctx, args).await,
        Commands::Chat(args) => handlers::chat::execute(&ctx, args).await,
    }
}
