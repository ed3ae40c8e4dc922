//! Subprocess execution
//!
//! One primitive: run a command to completion, capture stdout, stream
//! stderr through for diagnostics. The trait is a seam so the setup flow
//! can be exercised without spawning real processes.

use crate::error::{MintupError, MintupResult};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// A fully-described command invocation
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Process execution seam
///
/// Every operation is attempted at most once; there is no retry policy.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command to completion, returning captured stdout.
    /// A non-zero exit status is an error carrying the exit code.
    async fn run(&self, spec: &CommandSpec) -> MintupResult<String>;
}

/// Runs commands on the host system
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec) -> MintupResult<String> {
        debug!("Executing: {}", spec);

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }
        for (key, value) in &spec.env {
            command.env(key, value);
        }

        let mut child = command
            .spawn()
            .map_err(|e| MintupError::command_failed(spec.to_string(), e))?;

        // stderr is surfaced line by line for diagnostics, not captured
        let stderr = child.stderr.take();
        let forward = tokio::spawn(async move {
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    eprintln!("{}", line);
                }
            }
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| MintupError::command_failed(spec.to_string(), e))?;
        forward.await.ok();

        if !output.status.success() {
            return Err(MintupError::CommandExecution {
                command: spec.to_string(),
                code: output.status.code().unwrap_or(-1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_display_joins_program_and_args() {
        let spec = CommandSpec::new("git").args(["clone", "--depth=1"]);
        assert_eq!(spec.to_string(), "git clone --depth=1");
    }

    #[test]
    fn spec_builder_accumulates() {
        let spec = CommandSpec::new("mint")
            .arg("bootstrap")
            .arg("--link")
            .cwd("/work")
            .env("MINT_PATH", "/home/ci/.mint");
        assert_eq!(spec.args, vec!["bootstrap", "--link"]);
        assert_eq!(spec.cwd.as_deref(), Some(std::path::Path::new("/work")));
        assert_eq!(spec.env.len(), 1);
    }

    #[tokio::test]
    async fn system_runner_captures_stdout() {
        let runner = SystemRunner;
        let out = runner
            .run(&CommandSpec::new("echo").arg("hello"))
            .await
            .unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn system_runner_reports_exit_code() {
        let runner = SystemRunner;
        let err = runner
            .run(&CommandSpec::new("sh").args(["-c", "exit 3"]))
            .await
            .unwrap_err();
        match err {
            MintupError::CommandExecution { code, .. } => assert_eq!(code, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn system_runner_spawn_failure() {
        let runner = SystemRunner;
        let err = runner
            .run(&CommandSpec::new("mintup-definitely-not-a-binary"))
            .await
            .unwrap_err();
        assert!(matches!(err, MintupError::CommandFailed { .. }));
    }
}
