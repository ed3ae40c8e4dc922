//! Prune command - uninstall packages no longer declared in the Mintfile

use crate::cli::args::PruneArgs;
use crate::config::{RunnerEnv, SetupConfig, SetupOptions};
use crate::error::{MintupError, MintupResult};
use crate::manifest::Manifest;
use crate::process::SystemRunner;
use crate::prune::{find_orphans, list_installed, prune_orphans};
use crate::ui;
use std::env;

/// Execute the prune command
pub async fn execute(args: PruneArgs) -> MintupResult<()> {
    let project_dir = match args.project {
        Some(dir) => dir,
        None => env::current_dir().map_err(|e| MintupError::io("getting current directory", e))?,
    };

    let runner_env = RunnerEnv::capture()?;
    let options = SetupOptions {
        mint_directory: args.mint_directory,
        mint_executable_directory: args.mint_executable_directory,
        ..Default::default()
    };
    let config = SetupConfig::resolve(options, None, project_dir, None, runner_env);

    let manifest = Manifest::load(&config.manifest_path())
        .await?
        .ok_or_else(|| MintupError::ManifestMissing(config.manifest_path()))?;

    if args.dry_run {
        let orphans = find_orphans(
            list_installed(&config.packages_dir())?,
            &manifest.accepted_ids(),
        );
        if orphans.is_empty() {
            println!("Nothing to prune.");
            return Ok(());
        }
        for orphan in &orphans {
            println!("{}", orphan.full_id());
        }
        return Ok(());
    }

    let runner = SystemRunner;
    let pruned = prune_orphans(&runner, &config, &manifest).await?;
    if pruned.is_empty() {
        println!("Nothing to prune.");
    } else {
        for orphan in &pruned {
            ui::step_ok_detail("uninstalled", &orphan.full_id());
        }
    }
    Ok(())
}
