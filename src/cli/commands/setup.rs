//! Setup command - the full install/cache/bootstrap/prune flow
//!
//! The flow is linear and fully awaited step by step: resolve the target
//! version, restore-or-install the mint binary, then restore-or-bootstrap
//! the Mintfile dependencies, pruning orphans after a fresh bootstrap.

use crate::bootstrap::run_bootstrap;
use crate::cache::{
    dependency_keys, hash_manifest, tool_key, CachePhase, CacheStore, DirCacheStore,
    RestoreOutcome,
};
use crate::cli::args::SetupArgs;
use crate::config::{self, RunnerEnv, SetupConfig, SetupOptions};
use crate::error::{MintupError, MintupResult};
use crate::installer::install_tool;
use crate::manifest::{resolve_version, Manifest};
use crate::process::{ProcessRunner, SystemRunner};
use crate::prune::{prune_orphans, InstalledPackage};
use crate::ui;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What the run decided and did, for the summary and for tests
#[derive(Debug)]
pub struct SetupReport {
    pub version: String,
    pub tool: CachePhase,
    pub dependencies: CachePhase,
    pub pruned: Vec<String>,
}

/// Execute the setup command
pub async fn execute(args: SetupArgs) -> MintupResult<()> {
    ui::intro("Mint Setup");

    let project_dir = match args.project.clone() {
        Some(dir) => dir,
        None => env::current_dir().map_err(|e| MintupError::io("getting current directory", e))?,
    };

    let local = if args.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else if let Some(path) = config::find_local_config(&project_dir) {
        debug!("Found local config: {}", path.display());
        Some(config::load_local_config(&path).await?)
    } else {
        None
    };

    let runner_env = RunnerEnv::capture()?;
    let config = SetupConfig::resolve(
        options_from_args(&args),
        local,
        project_dir,
        args.cache_dir.clone(),
        runner_env,
    );

    let runner = SystemRunner;
    let store = DirCacheStore::new(config.cache_dir.clone());
    let report = run_setup(&config, &runner, &store).await?;

    print_summary(&report);
    Ok(())
}

fn options_from_args(args: &SetupArgs) -> SetupOptions {
    SetupOptions {
        bootstrap: args.bootstrap,
        bootstrap_link: args.bootstrap_link,
        use_cache: args.use_cache,
        cache_prefix: args.cache_prefix.clone(),
        clean: args.clean,
        mint_directory: args.mint_directory.clone(),
        mint_executable_directory: args.mint_executable_directory.clone(),
    }
}

/// The linear setup flow against explicit seams, so it is testable without
/// real subprocesses or a real store.
pub async fn run_setup(
    config: &SetupConfig,
    runner: &dyn ProcessRunner,
    store: &dyn CacheStore,
) -> MintupResult<SetupReport> {
    let manifest = Manifest::load(&config.manifest_path()).await?;
    let version = resolve_version(manifest.as_ref());
    info!("Resolved mint version {}", version);

    let tool = install_phase(config, runner, store, &version).await?;

    let (dependencies, pruned) = match &manifest {
        Some(manifest) if config.bootstrap => {
            bootstrap_phase(config, runner, store, manifest).await?
        }
        Some(_) => {
            debug!("Bootstrap not requested");
            (CachePhase::Unchecked, Vec::new())
        }
        None => {
            debug!("No Mintfile; skipping bootstrap");
            (CachePhase::Unchecked, Vec::new())
        }
    };

    Ok(SetupReport {
        version,
        tool,
        dependencies,
        pruned,
    })
}

/// Restore the mint binary, or clone+build+save on a miss.
async fn install_phase(
    config: &SetupConfig,
    runner: &dyn ProcessRunner,
    store: &dyn CacheStore,
    version: &str,
) -> MintupResult<CachePhase> {
    let paths = vec![config.mint_binary()];
    let key = tool_key(&config.cache_prefix, &config.env.os, &config.env.arch, version);
    debug!("Tool cache key: {}", key);

    if config.use_cache {
        let matched = store.restore(&paths, &key, &[]).await?;
        if let RestoreOutcome::Exact(matched_key) = RestoreOutcome::classify(&key, matched) {
            ui::step_ok_detail("mint restored from cache", &matched_key);
            return Ok(CachePhase::Restored { key: matched_key });
        }
    }

    install_tool(runner, config, version).await?;
    ui::step_ok_detail("mint installed", version);

    if config.use_cache {
        save_quietly(store, &paths, &key).await;
        return Ok(CachePhase::Rebuilt { key, partial: None });
    }
    Ok(CachePhase::Unchecked)
}

/// Restore the dependency state, or bootstrap (and optionally prune) and
/// save. The packages tree and linked binaries are two entries under one
/// decision: the bootstrap is skipped only when every requested entry hit
/// its exact key.
async fn bootstrap_phase(
    config: &SetupConfig,
    runner: &dyn ProcessRunner,
    store: &dyn CacheStore,
    manifest: &Manifest,
) -> MintupResult<(CachePhase, Vec<String>)> {
    let hash = hash_manifest(&config.manifest_path())?;
    let keys = dependency_keys(&config.cache_prefix, &config.env.os, &config.env.arch, &hash);
    debug!("Dependency cache key: {}", keys.packages.key);

    let packages_paths = vec![config.packages_dir()];
    let links_paths = vec![config.link_dir.clone()];

    let mut outcome = RestoreOutcome::Miss;
    if config.use_cache {
        let matched = store
            .restore(&packages_paths, &keys.packages.key, &keys.packages.fallbacks)
            .await?;
        outcome = RestoreOutcome::classify(&keys.packages.key, matched);

        if config.bootstrap_link {
            let matched = store
                .restore(&links_paths, &keys.links.key, &keys.links.fallbacks)
                .await?;
            let links = RestoreOutcome::classify(&keys.links.key, matched);
            if outcome.is_exact() && !links.is_exact() {
                outcome = match links {
                    RestoreOutcome::Partial(key) => RestoreOutcome::Partial(key),
                    _ => RestoreOutcome::Miss,
                };
            }
        }

        if let RestoreOutcome::Exact(key) = &outcome {
            ui::step_ok_detail("dependencies restored from cache", key);
            return Ok((CachePhase::Restored { key: key.clone() }, Vec::new()));
        }
    }

    run_bootstrap(runner, config).await?;
    ui::step_ok("Mintfile dependencies bootstrapped");

    let mut pruned = Vec::new();
    if config.use_cache && config.clean {
        let orphans = prune_orphans(runner, config, manifest).await?;
        pruned = orphans.iter().map(InstalledPackage::full_id).collect();
        if pruned.is_empty() {
            debug!("No orphaned packages");
        } else {
            ui::step_ok_detail("pruned orphaned packages", &pruned.join(", "));
        }
    }

    if config.use_cache {
        save_quietly(store, &packages_paths, &keys.packages.key).await;
        if config.bootstrap_link {
            save_quietly(store, &links_paths, &keys.links.key).await;
        }
        return Ok((CachePhase::from_outcome(&keys.packages.key, &outcome), pruned));
    }
    Ok((CachePhase::Unchecked, pruned))
}

/// Save failures never fail the run: concurrent runs race the same key
/// and only one save needs to succeed.
async fn save_quietly(store: &dyn CacheStore, paths: &[PathBuf], key: &str) {
    if let Err(e) = store.save(paths, key).await {
        warn!("Cache save failed for {}: {}", key, e);
        ui::step_warn(&format!("cache save failed: {}", e));
    }
}

fn print_summary(report: &SetupReport) {
    ui::section("Setup summary");
    ui::key_value("mint version", &report.version);
    ui::key_value("tool cache", &report.tool.to_string());
    ui::key_value("dependency cache", &report.dependencies.to_string());
    if !report.pruned.is_empty() {
        ui::key_value("pruned", &report.pruned.join(", "));
    }
    ui::outro_success("mint ready");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::RecordingRunner;
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Store stub with preloaded keys; records saves, optionally failing them
    struct ScriptedStore {
        keys: Vec<String>,
        fail_save: bool,
        saves: Mutex<Vec<String>>,
    }

    impl ScriptedStore {
        fn empty() -> Self {
            Self::with_keys(Vec::new())
        }

        fn with_keys(keys: Vec<String>) -> Self {
            Self {
                keys,
                fail_save: false,
                saves: Mutex::new(Vec::new()),
            }
        }

        fn failing_saves() -> Self {
            Self {
                fail_save: true,
                ..Self::empty()
            }
        }

        fn saves(&self) -> Vec<String> {
            self.saves.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CacheStore for ScriptedStore {
        async fn restore(
            &self,
            _paths: &[PathBuf],
            key: &str,
            fallback_prefixes: &[String],
        ) -> MintupResult<Option<String>> {
            if self.keys.iter().any(|k| k == key) {
                return Ok(Some(key.to_string()));
            }
            for prefix in fallback_prefixes {
                if let Some(found) = self.keys.iter().find(|k| k.starts_with(prefix.as_str())) {
                    return Ok(Some(found.clone()));
                }
            }
            Ok(None)
        }

        async fn save(&self, _paths: &[PathBuf], key: &str) -> MintupResult<()> {
            self.saves.lock().unwrap().push(key.to_string());
            if self.fail_save {
                return Err(MintupError::CacheKeyExists(key.to_string()));
            }
            Ok(())
        }
    }

    /// Runner that fabricates the swift build product and accepts
    /// everything else
    fn building_runner() -> RecordingRunner {
        RecordingRunner::new(|spec| {
            if spec.program == "swift" {
                let package_path = spec.args.last().unwrap();
                let release = Path::new(package_path).join(".build/release");
                fs::create_dir_all(&release).unwrap();
                fs::write(release.join("mint"), "mint-binary").unwrap();
            }
            Ok(String::new())
        })
    }

    fn config_in(dir: &TempDir, bootstrap: bool, clean: bool, use_cache: bool) -> SetupConfig {
        let env = RunnerEnv {
            os: "Linux".to_string(),
            arch: "X64".to_string(),
            temp_dir: dir.path().join("tmp"),
            home_dir: dir.path().join("home"),
            mint_path: None,
            mint_link_path: None,
        };
        let options = SetupOptions {
            bootstrap: Some(bootstrap),
            clean: Some(clean),
            use_cache: Some(use_cache),
            cache_prefix: Some("ci".to_string()),
            mint_directory: Some(dir.path().join("mint")),
            mint_executable_directory: Some(dir.path().join("bin")),
            ..Default::default()
        };
        let project_dir = dir.path().join("work");
        fs::create_dir_all(&project_dir).unwrap();
        SetupConfig::resolve(
            options,
            None,
            project_dir,
            Some(dir.path().join("cache")),
            env,
        )
    }

    fn write_manifest(config: &SetupConfig, text: &str) {
        fs::write(config.manifest_path(), text).unwrap();
    }

    fn all_exact_keys(config: &SetupConfig, version: &str) -> Vec<String> {
        let hash = hash_manifest(&config.manifest_path()).unwrap();
        let deps = dependency_keys(&config.cache_prefix, &config.env.os, &config.env.arch, &hash);
        vec![
            tool_key(&config.cache_prefix, &config.env.os, &config.env.arch, version),
            deps.packages.key,
            deps.links.key,
        ]
    }

    #[tokio::test]
    async fn restore_hit_short_circuits_every_subprocess() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, true, false, true);
        write_manifest(&config, "owner/mint@1.2.3\nrealm/SwiftLint@0.54.0\n");

        let store = ScriptedStore::with_keys(all_exact_keys(&config, "1.2.3"));
        let runner = RecordingRunner::ok();

        let report = run_setup(&config, &runner, &store).await.unwrap();

        assert_eq!(report.version, "1.2.3");
        assert!(report.tool.is_restored());
        assert!(report.dependencies.is_restored());
        assert!(runner.commands().is_empty());
        assert!(store.saves().is_empty());
    }

    #[tokio::test]
    async fn no_manifest_builds_once_and_never_bootstraps() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, true, false, true);

        let store = ScriptedStore::empty();
        let runner = building_runner();

        let report = run_setup(&config, &runner, &store).await.unwrap();

        assert_eq!(report.version, "0.17.0");
        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands[0].starts_with("git "));
        assert!(commands[1].starts_with("swift "));

        let expected = tool_key("ci", "Linux", "X64", "0.17.0");
        assert_eq!(store.saves(), vec![expected.clone()]);
        assert_eq!(
            report.tool,
            CachePhase::Rebuilt {
                key: expected,
                partial: None
            }
        );
        assert_eq!(report.dependencies, CachePhase::Unchecked);
    }

    #[tokio::test]
    async fn save_failure_never_fails_the_run() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, false, false, true);

        let store = ScriptedStore::failing_saves();
        let runner = building_runner();

        let report = run_setup(&config, &runner, &store).await.unwrap();
        assert_eq!(store.saves().len(), 1);
        assert!(!report.tool.is_restored());
    }

    #[tokio::test]
    async fn partial_hit_still_bootstraps_and_records_the_warm_key() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, true, false, true);
        write_manifest(&config, "realm/SwiftLint@0.54.0\n");

        let stale = "ci-Linux-X64-mintup-packages-000000000000".to_string();
        let tool = tool_key("ci", "Linux", "X64", "0.17.0");
        let store = ScriptedStore::with_keys(vec![tool, stale.clone()]);
        let runner = RecordingRunner::ok();

        let report = run_setup(&config, &runner, &store).await.unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].contains("bootstrap"));
        assert!(commands[0].contains("--link"));

        match report.dependencies {
            CachePhase::Rebuilt { partial, .. } => assert_eq!(partial.as_deref(), Some(stale.as_str())),
            other => panic!("expected rebuilt, got {other}"),
        }
        // fresh entries are saved for both trees
        assert_eq!(store.saves().len(), 2);
    }

    #[tokio::test]
    async fn clean_prunes_after_a_fresh_bootstrap() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, true, true, true);
        write_manifest(&config, "a/b@1.0\n");

        let packages = config.packages_dir();
        fs::create_dir_all(packages.join("github.com_a_b/build/1.0")).unwrap();
        fs::create_dir_all(packages.join("github.com_e_f/build/3.0")).unwrap();

        let tool = tool_key("ci", "Linux", "X64", "0.17.0");
        let store = ScriptedStore::with_keys(vec![tool]);
        let runner = RecordingRunner::ok();

        let report = run_setup(&config, &runner, &store).await.unwrap();

        assert_eq!(report.pruned, vec!["e/f@3.0"]);
        assert!(!packages.join("github.com_e_f").exists());
        assert!(packages.join("github.com_a_b/build/1.0").exists());

        let commands = runner.commands();
        assert!(commands.iter().any(|c| c.contains("bootstrap")));
        assert!(commands.iter().any(|c| c.contains("uninstall e/f@3.0")));
    }

    #[tokio::test]
    async fn cache_disabled_skips_store_and_prune() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, true, true, false);
        write_manifest(&config, "a/b@1.0\n");

        let packages = config.packages_dir();
        fs::create_dir_all(packages.join("github.com_e_f/build/3.0")).unwrap();

        let store = ScriptedStore::empty();
        let runner = building_runner();

        let report = run_setup(&config, &runner, &store).await.unwrap();

        assert_eq!(report.tool, CachePhase::Unchecked);
        assert_eq!(report.dependencies, CachePhase::Unchecked);
        assert!(report.pruned.is_empty());
        assert!(store.saves().is_empty());
        // orphan left alone without the clean+cache gate
        assert!(packages.join("github.com_e_f/build/3.0").exists());
    }

    #[tokio::test]
    async fn bootstrap_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, true, false, true);
        write_manifest(&config, "a/b@1.0\n");

        let tool = tool_key("ci", "Linux", "X64", "0.17.0");
        let store = ScriptedStore::with_keys(vec![tool]);
        let runner = RecordingRunner::new(|spec| {
            Err(MintupError::CommandExecution {
                command: spec.to_string(),
                code: 1,
            })
        });

        let err = run_setup(&config, &runner, &store).await.unwrap_err();
        assert!(matches!(err, MintupError::BootstrapFailed { .. }));
    }
}
