//! Cache system for the mint binary and bootstrapped dependencies
//!
//! Two independent cached phases: the tool binary, keyed by resolved
//! version, and the dependency tree plus linked binaries, keyed by a
//! content hash of the Mintfile. Restore decisions are explicit states so
//! a rebuild is always explainable from the logs.

pub mod keys;
pub mod state;
pub mod store;

pub use keys::{dependency_keys, hash_manifest, tool_key, DependencyKeys, KeyedEntry};
pub use state::{CachePhase, RestoreOutcome};
pub use store::{CacheStore, DirCacheStore};
