//! Error types for mintup
//!
//! All modules use `MintupResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mintup operations
pub type MintupResult<T> = Result<T, MintupError>;

/// All errors that can occur in mintup
#[derive(Error, Debug)]
pub enum MintupError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Home directory could not be determined")]
    HomeNotFound,

    // Manifest errors
    #[error("Failed to read Mintfile at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mintfile not found at {0}")]
    ManifestMissing(PathBuf),

    // Install errors
    #[error("Failed to clone Mint {version}: {reason}")]
    CloneFailed { version: String, reason: String },

    #[error("Failed to build Mint: {reason}")]
    BuildFailed { reason: String },

    #[error("Built mint binary not found at {0}")]
    BinaryNotFound(PathBuf),

    // Bootstrap errors
    #[error("mint bootstrap failed: {reason}")]
    BootstrapFailed { reason: String },

    #[error("Failed to uninstall {package}: {reason}")]
    UninstallFailed { package: String, reason: String },

    // Cache errors
    #[error("Cache key already saved: {0}")]
    CacheKeyExists(String),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with status {code}: {command}")]
    CommandExecution { command: String, code: i32 },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl MintupError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CloneFailed { .. } => Some("Check the version pinned for mint in the Mintfile"),
            Self::BuildFailed { .. } => Some("Check that a Swift toolchain is on PATH"),
            Self::HomeNotFound => Some("Set HOME, or pass --mint-directory explicitly"),
            Self::ManifestMissing(_) => Some("Run from the project root, or pass --project"),
            _ => None,
        }
    }
}
