//! mintup - CI setup helper for the Mint Swift package manager
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use mintup::cli::{Cli, Commands};
use mintup::error::MintupResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MintupResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("mintup=warn"),
        1 => EnvFilter::new("mintup=info"),
        _ => EnvFilter::new("mintup=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Setup(args) => mintup::cli::commands::setup(args).await,
        Commands::Resolve(args) => mintup::cli::commands::resolve(args).await,
        Commands::Keys(args) => mintup::cli::commands::keys(args).await,
        Commands::Prune(args) => mintup::cli::commands::prune(args).await,
        Commands::Completions(args) => mintup::cli::commands::completions(args),
    }
}
