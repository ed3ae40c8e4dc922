//! Mint toolchain installation
//!
//! On a cache miss the pinned version is cloned into a unique temp
//! workspace, built with swift, and the product copied into the
//! executable directory.

use crate::config::SetupConfig;
use crate::error::{MintupError, MintupResult};
use crate::manifest::MINT_REPOSITORY;
use crate::process::{CommandSpec, ProcessRunner};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Clone, build and place the mint binary at the configured location.
pub async fn install_tool(
    runner: &dyn ProcessRunner,
    config: &SetupConfig,
    version: &str,
) -> MintupResult<()> {
    let workspace = config.env.temp_dir.join(format!("mintup-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&workspace)
        .await
        .map_err(|e| MintupError::io(format!("creating workspace {}", workspace.display()), e))?;

    let result = build_and_place(runner, config, version, &workspace).await;

    if let Err(e) = tokio::fs::remove_dir_all(&workspace).await {
        warn!("Failed to remove workspace {}: {}", workspace.display(), e);
    }
    result
}

async fn build_and_place(
    runner: &dyn ProcessRunner,
    config: &SetupConfig,
    version: &str,
    workspace: &Path,
) -> MintupResult<()> {
    let clone_dir = workspace.join("Mint");

    info!("Cloning Mint {}", version);
    let clone = CommandSpec::new("git")
        .args(["-c", "advice.detachedHead=false", "clone", "--depth=1", "-b"])
        .arg(version)
        .arg(MINT_REPOSITORY)
        .arg(clone_dir.display().to_string());
    runner.run(&clone).await.map_err(|e| MintupError::CloneFailed {
        version: version.to_string(),
        reason: e.to_string(),
    })?;

    info!("Building Mint {}", version);
    let build = CommandSpec::new("swift")
        .args(["build", "-c", "release", "--package-path"])
        .arg(clone_dir.display().to_string());
    runner.run(&build).await.map_err(|e| MintupError::BuildFailed {
        reason: e.to_string(),
    })?;

    let built = built_binary_path(&clone_dir, &config.env.os, &config.env.arch)
        .ok_or_else(|| MintupError::BinaryNotFound(clone_dir.join(".build/release/mint")))?;
    place_binary(&built, &config.mint_binary()).await
}

/// Locate the built product. `swift build` links `.build/release` to the
/// full target-triple directory; the link can be absent on some toolchain
/// versions, so both locations are checked.
pub fn built_binary_path(clone_dir: &Path, os: &str, arch: &str) -> Option<PathBuf> {
    let direct = clone_dir.join(".build").join("release").join("mint");
    if direct.exists() {
        return Some(direct);
    }
    let triple = clone_dir
        .join(".build")
        .join(target_triple(os, arch))
        .join("release")
        .join("mint");
    triple.exists().then_some(triple)
}

/// Swift target triple for a runner OS/arch pair.
fn target_triple(os: &str, arch: &str) -> String {
    match (os, arch) {
        ("macOS", "ARM64") => "arm64-apple-macosx".to_string(),
        ("macOS", _) => "x86_64-apple-macosx".to_string(),
        (_, "ARM64") => "aarch64-unknown-linux-gnu".to_string(),
        _ => "x86_64-unknown-linux-gnu".to_string(),
    }
}

async fn place_binary(built: &Path, target: &Path) -> MintupResult<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| MintupError::io(format!("creating {}", parent.display()), e))?;
    }
    tokio::fs::copy(built, target)
        .await
        .map_err(|e| MintupError::io(format!("installing {}", target.display()), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(target, std::fs::Permissions::from_mode(0o755))
            .map_err(|e| MintupError::io("setting binary permissions", e))?;
    }

    debug!("Installed mint at {}", target.display());
    Ok(())
}
