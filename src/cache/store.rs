//! Cache store seam and directory-backed implementation
//!
//! The store is a key→blob mapping with fallback-prefix lookup. CI runners
//! point `--cache-dir` at a directory that survives across runs, such as a
//! mounted volume or a runner-local cache path.

use crate::error::{MintupError, MintupResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key→blob store with fallback-prefix lookup
///
/// `restore` returns the matched key — which differs from `key` on a
/// fallback hit — or `None` on a miss; a miss is a normal branch, not an
/// error. `save` may fail when concurrent runs race the same key; callers
/// downgrade that to a warning.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn restore(
        &self,
        paths: &[PathBuf],
        key: &str,
        fallback_prefixes: &[String],
    ) -> MintupResult<Option<String>>;

    async fn save(&self, paths: &[PathBuf], key: &str) -> MintupResult<()>;
}

/// Metadata record stored beside each entry's data
#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    key: String,
    created_at: DateTime<Utc>,
    paths: Vec<PathBuf>,
}

/// Directory-backed store: one subdirectory per saved key
pub struct DirCacheStore {
    root: PathBuf,
}

impl DirCacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Entry directory name. Keys contain user-supplied text, so entries
    /// are addressed by key digest with the real key in the metadata.
    fn entry_dir_name(key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        hex::encode(&digest[..8])
    }

    fn entry_dir(&self, key: &str) -> PathBuf {
        self.root.join(Self::entry_dir_name(key))
    }

    fn read_meta(dir: &Path) -> Option<EntryMeta> {
        let raw = fs::read_to_string(dir.join("entry.json")).ok()?;
        match serde_json::from_str(&raw) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!("Ignoring corrupt cache entry {}: {}", dir.display(), e);
                None
            }
        }
    }

    /// All readable entries under the root.
    fn entries(&self) -> Vec<(PathBuf, EntryMeta)> {
        let Ok(read) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        read.flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| Self::read_meta(&path).map(|meta| (path, meta)))
            .collect()
    }

    /// Most recent entry whose key starts with `prefix`.
    fn latest_with_prefix(&self, prefix: &str) -> Option<(PathBuf, EntryMeta)> {
        self.entries()
            .into_iter()
            .filter(|(_, meta)| meta.key.starts_with(prefix))
            .max_by_key(|(_, meta)| meta.created_at)
    }

    /// Copy an entry's trees back to their recorded locations.
    fn restore_entry(dir: &Path, meta: &EntryMeta) -> MintupResult<()> {
        for (index, target) in meta.paths.iter().enumerate() {
            let data = dir.join("data").join(index.to_string());
            if !data.exists() {
                // path was missing at save time
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| MintupError::io(format!("creating {}", parent.display()), e))?;
            }
            copy_tree(&data, target)?;
        }
        Ok(())
    }

    fn write_entry(staging: &Path, paths: &[PathBuf], key: &str) -> MintupResult<()> {
        let data_root = staging.join("data");
        fs::create_dir_all(&data_root)
            .map_err(|e| MintupError::io(format!("creating {}", data_root.display()), e))?;

        for (index, path) in paths.iter().enumerate() {
            if !path.exists() {
                warn!("Skipping missing path {}", path.display());
                continue;
            }
            copy_tree(path, &data_root.join(index.to_string()))?;
        }

        let meta = EntryMeta {
            key: key.to_string(),
            created_at: Utc::now(),
            paths: paths.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&meta)?;
        fs::write(staging.join("entry.json"), raw)
            .map_err(|e| MintupError::io("writing cache entry metadata", e))?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for DirCacheStore {
    async fn restore(
        &self,
        _paths: &[PathBuf],
        key: &str,
        fallback_prefixes: &[String],
    ) -> MintupResult<Option<String>> {
        let dir = self.entry_dir(key);
        if let Some(meta) = Self::read_meta(&dir) {
            debug!("Cache hit: {}", key);
            Self::restore_entry(&dir, &meta)?;
            return Ok(Some(meta.key));
        }

        for prefix in fallback_prefixes {
            if let Some((dir, meta)) = self.latest_with_prefix(prefix) {
                debug!("Cache fallback hit: {} (wanted {})", meta.key, key);
                Self::restore_entry(&dir, &meta)?;
                return Ok(Some(meta.key));
            }
        }

        debug!("Cache miss: {}", key);
        Ok(None)
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> MintupResult<()> {
        let dir = self.entry_dir(key);
        if dir.exists() {
            return Err(MintupError::CacheKeyExists(key.to_string()));
        }
        fs::create_dir_all(&self.root)
            .map_err(|e| MintupError::io(format!("creating {}", self.root.display()), e))?;

        // Stage beside the final location, then rename: a concurrent save
        // of the same key fails the rename instead of interleaving writes.
        let staging = self
            .root
            .join(format!(".{}-{}", Self::entry_dir_name(key), std::process::id()));
        if let Err(e) = Self::write_entry(&staging, paths, key) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        match fs::rename(&staging, &dir) {
            Ok(()) => {
                debug!("Cache saved: {}", key);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_dir_all(&staging);
                if dir.exists() {
                    Err(MintupError::CacheKeyExists(key.to_string()))
                } else {
                    Err(MintupError::io(format!("saving cache entry {}", key), e))
                }
            }
        }
    }
}

/// Copy a file, symlink or directory tree. `fs::copy` carries unix
/// permission bits, which keeps restored binaries executable.
fn copy_tree(src: &Path, dst: &Path) -> MintupResult<()> {
    let meta = fs::symlink_metadata(src)
        .map_err(|e| MintupError::io(format!("reading {}", src.display()), e))?;

    if meta.file_type().is_symlink() {
        #[cfg(unix)]
        {
            let target = fs::read_link(src)
                .map_err(|e| MintupError::io(format!("reading link {}", src.display()), e))?;
            if dst.exists() {
                let _ = fs::remove_file(dst);
            }
            std::os::unix::fs::symlink(&target, dst)
                .map_err(|e| MintupError::io(format!("linking {}", dst.display()), e))?;
        }
        #[cfg(not(unix))]
        warn!("Skipping symlink {}", src.display());
    } else if meta.is_dir() {
        fs::create_dir_all(dst)
            .map_err(|e| MintupError::io(format!("creating {}", dst.display()), e))?;
        let entries = fs::read_dir(src)
            .map_err(|e| MintupError::io(format!("listing {}", src.display()), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| MintupError::io("reading directory entry", e))?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dst)
            .map_err(|e| MintupError::io(format!("copying to {}", dst.display()), e))?;
    }
    Ok(())
}
