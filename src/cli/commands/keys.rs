//! Keys command - print the cache keys derived for this project

use crate::cache::{dependency_keys, hash_manifest, tool_key, DependencyKeys};
use crate::cli::args::{KeysArgs, OutputFormat};
use crate::config::RunnerEnv;
use crate::error::{MintupError, MintupResult};
use crate::manifest::{resolve_version, Manifest, MANIFEST_FILE};
use crate::ui;
use std::env;

/// Execute the keys command
pub async fn execute(args: KeysArgs) -> MintupResult<()> {
    let project_dir = match args.project {
        Some(dir) => dir,
        None => env::current_dir().map_err(|e| MintupError::io("getting current directory", e))?,
    };

    let runner_env = RunnerEnv::capture()?;
    let prefix = args.cache_prefix.unwrap_or_default();

    let manifest_path = project_dir.join(MANIFEST_FILE);
    let manifest = Manifest::load(&manifest_path).await?;
    let version = resolve_version(manifest.as_ref());

    let tool = tool_key(&prefix, &runner_env.os, &runner_env.arch, &version);
    let dependencies = match &manifest {
        Some(_) => {
            let hash = hash_manifest(&manifest_path)?;
            Some(dependency_keys(&prefix, &runner_env.os, &runner_env.arch, &hash))
        }
        None => None,
    };

    match args.format {
        OutputFormat::Table => print_table(&version, &tool, dependencies.as_ref()),
        OutputFormat::Json => print_json(&version, &tool, dependencies.as_ref())?,
        OutputFormat::Plain => print_plain(&tool, dependencies.as_ref()),
    }
    Ok(())
}

fn print_table(version: &str, tool: &str, dependencies: Option<&DependencyKeys>) {
    ui::key_value("mint version", version);
    ui::key_value("tool", tool);
    match dependencies {
        Some(keys) => {
            ui::key_value("packages", &keys.packages.key);
            ui::key_value("links", &keys.links.key);
        }
        None => println!("  No Mintfile; no dependency keys."),
    }
}

fn print_json(version: &str, tool: &str, dependencies: Option<&DependencyKeys>) -> MintupResult<()> {
    #[derive(serde::Serialize)]
    struct KeysJson<'a> {
        version: &'a str,
        tool: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        packages: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        links: Option<&'a str>,
    }

    let json = KeysJson {
        version,
        tool,
        packages: dependencies.map(|k| k.packages.key.as_str()),
        links: dependencies.map(|k| k.links.key.as_str()),
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_plain(tool: &str, dependencies: Option<&DependencyKeys>) {
    println!("{}", tool);
    if let Some(keys) = dependencies {
        println!("{}", keys.packages.key);
        println!("{}", keys.links.key);
    }
}
