//! Cache key derivation
//!
//! Keys are plain concatenations of the user prefix, runner OS, runner
//! architecture, a fixed namespace, and either the resolved mint version
//! or a content hash of the Mintfile. Same inputs, same keys.

use crate::error::{MintupError, MintupResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Fixed namespace segment in every key
pub const CACHE_NAMESPACE: &str = "mintup";

/// Hex chars of the manifest hash kept in keys
const HASH_LEN: usize = 12;

/// An exact key plus the fallback prefixes tried on a miss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedEntry {
    pub key: String,
    pub fallbacks: Vec<String>,
}

/// The two manifest-keyed entries: packages tree and linked binaries
#[derive(Debug, Clone)]
pub struct DependencyKeys {
    pub packages: KeyedEntry,
    pub links: KeyedEntry,
}

/// Key addressing the mint binary, keyed by resolved version.
///
/// No fallback list: a binary for a different version would be overwritten
/// by the rebuild anyway.
pub fn tool_key(prefix: &str, os: &str, arch: &str, version: &str) -> String {
    format!("{prefix}-{os}-{arch}-{CACHE_NAMESPACE}-{version}")
}

/// Keys addressing the bootstrapped dependency state, keyed by manifest
/// content hash. Fallback prefixes allow partial reuse of the most recent
/// entry after a manifest edit.
pub fn dependency_keys(prefix: &str, os: &str, arch: &str, manifest_hash: &str) -> DependencyKeys {
    let packages = format!("{prefix}-{os}-{arch}-{CACHE_NAMESPACE}-packages-");
    let links = format!("{prefix}-{os}-{arch}-{CACHE_NAMESPACE}-links-");
    DependencyKeys {
        packages: KeyedEntry {
            key: format!("{packages}{manifest_hash}"),
            fallbacks: vec![packages],
        },
        links: KeyedEntry {
            key: format!("{links}{manifest_hash}"),
            fallbacks: vec![links],
        },
    }
}

/// SHA-256 of the manifest bytes, first 12 hex chars.
pub fn hash_manifest(path: &Path) -> MintupResult<String> {
    let contents = std::fs::read(path)
        .map_err(|e| MintupError::io(format!("reading {}", path.display()), e))?;
    let digest = Sha256::digest(&contents);
    Ok(hex::encode(&digest[..HASH_LEN / 2]))
}
