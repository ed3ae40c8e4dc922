//! Resolve command - print the mint version the project pins

use crate::cli::args::ResolveArgs;
use crate::error::{MintupError, MintupResult};
use crate::manifest::{resolve_version, Manifest, MANIFEST_FILE};
use std::env;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs) -> MintupResult<()> {
    let project_dir = match args.project {
        Some(dir) => dir,
        None => env::current_dir().map_err(|e| MintupError::io("getting current directory", e))?,
    };

    let manifest = Manifest::load(&project_dir.join(MANIFEST_FILE)).await?;
    println!("{}", resolve_version(manifest.as_ref()));
    Ok(())
}
