//! CLI argument definitions using clap derive
//!
//! Setup inputs accept GitHub-Actions-style `INPUT_*` environment
//! fallbacks, so the binary drops into a workflow step without flag
//! plumbing. Boolean inputs take explicit `true`/`false` values the way
//! workflow inputs are passed.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// mintup - CI setup helper for the Mint Swift package manager
///
/// Installs a pinned mint binary, caches it and the bootstrapped
/// dependency tree across runs, and prunes packages no longer declared
/// in the Mintfile.
#[derive(Parser, Debug)]
#[command(name = "mintup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install mint, restore/save caches, bootstrap and prune dependencies
    Setup(SetupArgs),

    /// Print the mint version the project resolves to
    Resolve(ResolveArgs),

    /// Print the cache keys derived for this project
    Keys(KeysArgs),

    /// Uninstall packages no longer declared in the Mintfile
    Prune(PruneArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the setup command
#[derive(Parser, Debug)]
pub struct SetupArgs {
    /// Project directory holding the Mintfile (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Run `mint bootstrap` when a Mintfile is present
    #[arg(long, env = "INPUT_BOOTSTRAP", value_parser = BoolishValueParser::new())]
    pub bootstrap: Option<bool>,

    /// Pass `--link` to `mint bootstrap`
    #[arg(long, env = "INPUT_BOOTSTRAP_LINK", value_parser = BoolishValueParser::new())]
    pub bootstrap_link: Option<bool>,

    /// Cache the mint binary and dependency tree across runs
    #[arg(long, env = "INPUT_USE_CACHE", value_parser = BoolishValueParser::new())]
    pub use_cache: Option<bool>,

    /// Leading segment of every cache key
    #[arg(long, env = "INPUT_CACHE_PREFIX")]
    pub cache_prefix: Option<String>,

    /// Prune installed packages absent from the Mintfile after a fresh bootstrap
    #[arg(long, env = "INPUT_CLEAN", value_parser = BoolishValueParser::new())]
    pub clean: Option<bool>,

    /// Mint data directory (defaults to MINT_PATH, then ~/.mint)
    #[arg(long, env = "INPUT_MINT_DIRECTORY")]
    pub mint_directory: Option<PathBuf>,

    /// Directory the mint binary is installed into (defaults to /usr/local/bin)
    #[arg(long, env = "INPUT_MINT_EXECUTABLE_DIRECTORY")]
    pub mint_executable_directory: Option<PathBuf>,

    /// Cache store root (defaults to the user cache directory)
    #[arg(long, env = "MINTUP_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Skip project-local .mintup.toml discovery
    #[arg(long)]
    pub no_local: bool,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Project directory holding the Mintfile (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,
}

/// Arguments for the keys command
#[derive(Parser, Debug)]
pub struct KeysArgs {
    /// Project directory holding the Mintfile (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Leading segment of every cache key
    #[arg(long, env = "INPUT_CACHE_PREFIX")]
    pub cache_prefix: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for the prune command
#[derive(Parser, Debug)]
pub struct PruneArgs {
    /// Project directory holding the Mintfile (defaults to current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Mint data directory (defaults to MINT_PATH, then ~/.mint)
    #[arg(long, env = "INPUT_MINT_DIRECTORY")]
    pub mint_directory: Option<PathBuf>,

    /// Directory the mint binary is installed into (defaults to /usr/local/bin)
    #[arg(long, env = "INPUT_MINT_EXECUTABLE_DIRECTORY")]
    pub mint_executable_directory: Option<PathBuf>,

    /// List orphans without uninstalling them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Plain,
}
