//! Mintfile dependency bootstrap
//!
//! Invokes mint's own bootstrap step against the project Mintfile, with
//! the data and link directories pinned through the tool's environment
//! overrides.

use crate::config::SetupConfig;
use crate::error::{MintupError, MintupResult};
use crate::process::{CommandSpec, ProcessRunner};
use tracing::info;

/// Build the `mint bootstrap` invocation for this configuration.
pub fn bootstrap_command(config: &SetupConfig) -> CommandSpec {
    let mut spec = CommandSpec::new(config.mint_binary().display().to_string()).arg("bootstrap");
    if config.bootstrap_link {
        spec = spec.arg("--link");
    }
    spec.cwd(&config.project_dir)
        .env("MINT_PATH", config.mint_dir.display().to_string())
        .env("MINT_LINK_PATH", config.link_dir.display().to_string())
}

/// Run `mint bootstrap`, installing every Mintfile dependency.
pub async fn run_bootstrap(runner: &dyn ProcessRunner, config: &SetupConfig) -> MintupResult<()> {
    info!("Bootstrapping Mintfile dependencies");
    runner
        .run(&bootstrap_command(config))
        .await
        .map_err(|e| MintupError::BootstrapFailed {
            reason: e.to_string(),
        })?;
    Ok(())
}
