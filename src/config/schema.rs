//! Project-local configuration schema
//!
//! A `.mintup.toml` at the project root supplies defaults below CLI
//! options and their `INPUT_*` environment fallbacks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of a `.mintup.toml` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Setup defaults
    pub setup: SetupSection,
}

/// `[setup]` section mirroring the setup inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetupSection {
    /// Run `mint bootstrap` after installing mint
    pub bootstrap: Option<bool>,

    /// Pass `--link` to `mint bootstrap`
    pub bootstrap_link: Option<bool>,

    /// Cache the mint binary and dependency tree across runs
    pub use_cache: Option<bool>,

    /// Leading segment of every cache key
    pub cache_prefix: Option<String>,

    /// Prune packages absent from the Mintfile after a fresh bootstrap
    pub clean: Option<bool>,

    /// Mint data directory
    pub mint_directory: Option<PathBuf>,

    /// Directory the mint binary is installed into
    pub mint_executable_directory: Option<PathBuf>,
}
