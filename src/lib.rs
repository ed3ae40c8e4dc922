//! mintup - CI setup helper for the Mint Swift package manager
//!
//! Installs a pinned mint binary into a runner environment, caches the
//! built binary and the bootstrapped dependency tree across CI runs, and
//! optionally prunes packages no longer declared in the Mintfile.

pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod manifest;
pub mod process;
pub mod prune;
pub mod ui;

pub use error::{MintupError, MintupResult};
