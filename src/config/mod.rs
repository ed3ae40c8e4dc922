//! Configuration for the setup flow
//!
//! Ambient environment reads happen once, in [`RunnerEnv::capture`]; the
//! decision and pruning logic only ever sees explicit fields.

pub mod schema;

pub use schema::LocalConfig;

use crate::error::{MintupError, MintupResult};
use std::env;
use std::path::{Path, PathBuf};

/// Local config file name discovered at the project root
pub const LOCAL_CONFIG_FILE: &str = ".mintup.toml";

/// Default directory the mint binary is installed into
pub const DEFAULT_EXECUTABLE_DIR: &str = "/usr/local/bin";

/// Snapshot of the runner environment
#[derive(Debug, Clone)]
pub struct RunnerEnv {
    /// Runner operating system label (`Linux`, `macOS`, ...)
    pub os: String,

    /// Runner architecture label (`X64`, `ARM64`, ...)
    pub arch: String,

    /// Scratch directory for clone workspaces
    pub temp_dir: PathBuf,

    /// Home directory, anchoring the default mint data dir
    pub home_dir: PathBuf,

    /// `MINT_PATH` override for the mint data directory
    pub mint_path: Option<PathBuf>,

    /// `MINT_LINK_PATH` override for the linked-binary directory
    pub mint_link_path: Option<PathBuf>,
}

impl RunnerEnv {
    /// Capture the snapshot from process environment variables, falling
    /// back to host values outside hosted CI.
    pub fn capture() -> MintupResult<Self> {
        let os = env::var("RUNNER_OS").unwrap_or_else(|_| host_os_label().to_string());
        let arch = env::var("RUNNER_ARCH").unwrap_or_else(|_| host_arch_label().to_string());
        let temp_dir = env::var_os("RUNNER_TEMP")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);
        let home_dir = env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .ok_or(MintupError::HomeNotFound)?;

        Ok(Self {
            os,
            arch,
            temp_dir,
            home_dir,
            mint_path: env::var_os("MINT_PATH").map(PathBuf::from),
            mint_link_path: env::var_os("MINT_LINK_PATH").map(PathBuf::from),
        })
    }
}

/// Runner OS label for the host, used outside hosted CI
fn host_os_label() -> &'static str {
    match env::consts::OS {
        "macos" => "macOS",
        "linux" => "Linux",
        "windows" => "Windows",
        other => other,
    }
}

/// Runner architecture label for the host
fn host_arch_label() -> &'static str {
    match env::consts::ARCH {
        "x86_64" => "X64",
        "aarch64" => "ARM64",
        "x86" => "X86",
        other => other,
    }
}

/// The setup inputs, before defaulting
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub bootstrap: Option<bool>,
    pub bootstrap_link: Option<bool>,
    pub use_cache: Option<bool>,
    pub cache_prefix: Option<String>,
    pub clean: Option<bool>,
    pub mint_directory: Option<PathBuf>,
    pub mint_executable_directory: Option<PathBuf>,
}

/// Fully-resolved configuration the setup flow runs against
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Run `mint bootstrap` when a Mintfile is present
    pub bootstrap: bool,

    /// Pass `--link` to `mint bootstrap`
    pub bootstrap_link: bool,

    /// Cache the mint binary and dependency tree across runs
    pub use_cache: bool,

    /// Leading segment of every cache key
    pub cache_prefix: String,

    /// Prune packages absent from the Mintfile after a fresh bootstrap
    pub clean: bool,

    /// Mint data directory; packages live beneath it
    pub mint_dir: PathBuf,

    /// Directory the mint binary itself is installed into
    pub executable_dir: PathBuf,

    /// Directory bootstrapped binaries are linked into
    pub link_dir: PathBuf,

    /// Project directory holding the Mintfile
    pub project_dir: PathBuf,

    /// Root of the directory-backed cache store
    pub cache_dir: PathBuf,

    /// Runner environment snapshot
    pub env: RunnerEnv,
}

impl SetupConfig {
    /// Resolve inputs against the environment snapshot and local config.
    ///
    /// Precedence per field: CLI/env input, then `.mintup.toml`, then the
    /// tool-specific environment override, then the built-in default.
    pub fn resolve(
        options: SetupOptions,
        local: Option<LocalConfig>,
        project_dir: PathBuf,
        cache_dir: Option<PathBuf>,
        env: RunnerEnv,
    ) -> Self {
        let local = local.unwrap_or_default().setup;

        let mint_dir = options
            .mint_directory
            .or(local.mint_directory)
            .or_else(|| env.mint_path.clone())
            .unwrap_or_else(|| env.home_dir.join(".mint"));
        let executable_dir = options
            .mint_executable_directory
            .or(local.mint_executable_directory)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE_DIR));
        let link_dir = env
            .mint_link_path
            .clone()
            .unwrap_or_else(|| mint_dir.join("bin"));
        let cache_dir = cache_dir.unwrap_or_else(|| default_cache_dir(&env));

        Self {
            bootstrap: options.bootstrap.or(local.bootstrap).unwrap_or(false),
            bootstrap_link: options.bootstrap_link.or(local.bootstrap_link).unwrap_or(true),
            use_cache: options.use_cache.or(local.use_cache).unwrap_or(true),
            cache_prefix: options.cache_prefix.or(local.cache_prefix).unwrap_or_default(),
            clean: options.clean.or(local.clean).unwrap_or(false),
            mint_dir,
            executable_dir,
            link_dir,
            project_dir,
            cache_dir,
            env,
        }
    }

    /// `<mint-dir>/packages`
    pub fn packages_dir(&self) -> PathBuf {
        self.mint_dir.join("packages")
    }

    /// Path the mint binary is installed at
    pub fn mint_binary(&self) -> PathBuf {
        self.executable_dir.join("mint")
    }

    /// `<project>/Mintfile`
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(crate::manifest::MANIFEST_FILE)
    }
}

/// Default store root when `--cache-dir` is not given
fn default_cache_dir(env: &RunnerEnv) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| env.home_dir.join(".cache"))
        .join("mintup")
}

/// Find `.mintup.toml` at the project root.
pub fn find_local_config(project_dir: &Path) -> Option<PathBuf> {
    let path = project_dir.join(LOCAL_CONFIG_FILE);
    path.exists().then_some(path)
}

/// Load a local config file.
pub async fn load_local_config(path: &Path) -> MintupResult<LocalConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MintupError::io(format!("reading config from {}", path.display()), e))?;
    toml::from_str(&content).map_err(|e| MintupError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
