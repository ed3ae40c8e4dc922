//! Orphan package pruning
//!
//! After a fresh bootstrap, packages installed by a previous run but no
//! longer declared in the Mintfile are uninstalled and their build
//! directories removed.

use crate::config::SetupConfig;
use crate::error::{MintupError, MintupResult};
use crate::manifest::Manifest;
use crate::process::{CommandSpec, ProcessRunner};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// An installed package version found under the packages directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub owner: String,
    pub name: String,
    pub version: String,
    /// `<packages>/<entry>/build/<version>`
    pub build_dir: PathBuf,
}

impl InstalledPackage {
    /// `owner/name`
    pub fn short_id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// `owner/name@version`
    pub fn full_id(&self) -> String {
        format!("{}/{}@{}", self.owner, self.name, self.version)
    }
}

/// List installed package versions.
///
/// Directory names encode the coordinate in their last two
/// underscore-separated segments (`github.com_yonaskolb_XcodeGen`), with
/// one `build/<version>` directory per installed version.
pub fn list_installed(packages_dir: &Path) -> MintupResult<Vec<InstalledPackage>> {
    let mut installed = Vec::new();
    if !packages_dir.exists() {
        return Ok(installed);
    }

    let entries = fs::read_dir(packages_dir)
        .map_err(|e| MintupError::io(format!("listing {}", packages_dir.display()), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MintupError::io("reading packages directory", e))?;
        if !entry.path().is_dir() {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let Some((owner, name)) = coordinate_from_dir_name(&dir_name) else {
            debug!("Skipping unrecognized package directory {}", dir_name);
            continue;
        };

        let Ok(versions) = fs::read_dir(entry.path().join("build")) else {
            continue;
        };
        for version_entry in versions.flatten() {
            if !version_entry.path().is_dir() {
                continue;
            }
            installed.push(InstalledPackage {
                owner: owner.clone(),
                name: name.clone(),
                version: version_entry.file_name().to_string_lossy().into_owned(),
                build_dir: version_entry.path(),
            });
        }
    }
    Ok(installed)
}

/// Last two underscore-separated segments of the directory name.
fn coordinate_from_dir_name(dir_name: &str) -> Option<(String, String)> {
    let mut segments = dir_name.rsplitn(3, '_');
    let name = segments.next()?;
    let owner = segments.next()?;
    if name.is_empty() || owner.is_empty() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// Installed versions matching neither a declared full id nor short id.
pub fn find_orphans(
    installed: Vec<InstalledPackage>,
    accepted: &HashSet<String>,
) -> Vec<InstalledPackage> {
    installed
        .into_iter()
        .filter(|p| !accepted.contains(&p.full_id()) && !accepted.contains(&p.short_id()))
        .collect()
}

/// Uninstall every orphan and clear its build directory.
pub async fn prune_orphans(
    runner: &dyn ProcessRunner,
    config: &SetupConfig,
    manifest: &Manifest,
) -> MintupResult<Vec<InstalledPackage>> {
    let accepted = manifest.accepted_ids();
    let installed = list_installed(&config.packages_dir())?;
    let orphans = find_orphans(installed, &accepted);

    for orphan in &orphans {
        info!("Pruning {}", orphan.full_id());
        let uninstall = CommandSpec::new(config.mint_binary().display().to_string())
            .args(["uninstall", &orphan.full_id()])
            .env("MINT_PATH", config.mint_dir.display().to_string())
            .env("MINT_LINK_PATH", config.link_dir.display().to_string());
        runner
            .run(&uninstall)
            .await
            .map_err(|e| MintupError::UninstallFailed {
                package: orphan.full_id(),
                reason: e.to_string(),
            })?;
        remove_build_dir(orphan)?;
    }
    Ok(orphans)
}

/// Remove the orphan's version directory, then its parents only while they
/// are empty. A stray file next to a sibling version must not widen the
/// removal.
fn remove_build_dir(orphan: &InstalledPackage) -> MintupResult<()> {
    if orphan.build_dir.exists() {
        fs::remove_dir_all(&orphan.build_dir)
            .map_err(|e| MintupError::io(format!("removing {}", orphan.build_dir.display()), e))?;
    }

    // the build/ directory, then the package entry itself
    let mut parent = orphan.build_dir.parent();
    for _ in 0..2 {
        let Some(dir) = parent else { break };
        match fs::read_dir(dir) {
            Ok(mut entries) => {
                if entries.next().is_none() {
                    if let Err(e) = fs::remove_dir(dir) {
                        warn!("Leaving {} in place: {}", dir.display(), e);
                        break;
                    }
                } else {
                    break;
                }
            }
            _ => break,
        }
        parent = dir.parent();
    }
    Ok(())
}
