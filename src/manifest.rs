//! Mintfile parsing and mint version resolution
//!
//! A Mintfile declares one dependency coordinate per line, either
//! `owner/name@version` or bare `owner/name`. Blank lines and `#` comments
//! are ignored, leading whitespace is tolerated, and lines that fail to
//! parse are silently dropped.

use crate::error::{MintupError, MintupResult};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Manifest file name, by convention at the project root
pub const MANIFEST_FILE: &str = "Mintfile";

/// Version used when no Mintfile pins mint itself
pub const DEFAULT_MINT_VERSION: &str = "0.17.0";

/// Upstream mint repository, cloned at the pinned version on a cache miss
pub const MINT_REPOSITORY: &str = "https://github.com/yonaskolb/Mint.git";

/// A single dependency coordinate from a Mintfile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub owner: String,
    pub name: String,
    pub version: Option<String>,
}

impl ManifestEntry {
    /// `owner/name`
    pub fn short_id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// `owner/name@version`, when a version is pinned
    pub fn full_id(&self) -> Option<String> {
        self.version
            .as_ref()
            .map(|v| format!("{}/{}@{}", self.owner, self.name, v))
    }
}

/// Parsed Mintfile contents
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse Mintfile text. Never fails: malformed lines are dropped.
    pub fn parse(text: &str) -> Self {
        Self {
            entries: text.lines().filter_map(parse_line).collect(),
        }
    }

    /// Load the manifest at `path`; `None` when the file does not exist.
    pub async fn load(path: &Path) -> MintupResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MintupError::ManifestRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        let manifest = Self::parse(&text);
        debug!("Parsed {} Mintfile entries", manifest.entries.len());
        Ok(Some(manifest))
    }

    /// The identifiers pruning accepts: every entry's short id plus its
    /// full id when a version is pinned.
    pub fn accepted_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        for entry in &self.entries {
            ids.insert(entry.short_id());
            if let Some(full) = entry.full_id() {
                ids.insert(full);
            }
        }
        ids
    }

    /// The version mint itself is pinned at, from the first `*/mint@x` entry.
    pub fn mint_version(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == "mint" && e.version.is_some())
            .and_then(|e| e.version.as_deref())
    }
}

/// Resolve the target mint version: the manifest pin when present, else the
/// default. The pin is not validated here; a bad one fails later at clone.
pub fn resolve_version(manifest: Option<&Manifest>) -> String {
    manifest
        .and_then(Manifest::mint_version)
        .unwrap_or(DEFAULT_MINT_VERSION)
        .to_string()
}

/// Parse one line into a coordinate. The token ends at whitespace or `#`.
fn parse_line(line: &str) -> Option<ManifestEntry> {
    let token: String = line
        .trim_start()
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '#')
        .collect();
    if token.is_empty() {
        return None;
    }

    let (coordinate, version) = match token.split_once('@') {
        Some((_, v)) if v.is_empty() => return None,
        Some((c, v)) => (c, Some(v.to_string())),
        None => (token.as_str(), None),
    };

    let (owner, name) = coordinate.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(ManifestEntry {
        owner: owner.to_string(),
        name: name.to_string(),
        version,
    })
}
