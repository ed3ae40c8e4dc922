//! Completions command - shell completion generation

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::MintupResult;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> MintupResult<()> {
    let mut command = Cli::command();
    generate(args.shell, &mut command, "mintup", &mut io::stdout());
    Ok(())
}
