//! CLI command implementations

pub mod completions;
pub mod keys;
pub mod prune;
pub mod resolve;
pub mod setup;

pub use completions::execute as completions;
pub use keys::execute as keys;
pub use prune::execute as prune;
pub use resolve::execute as resolve;
pub use setup::execute as setup;
