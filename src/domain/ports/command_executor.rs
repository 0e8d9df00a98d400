use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::errors::CliError;

/// Arguments for one invocation of the deployment CLI.
///
/// The binary itself is owned by the executor; a command only carries the
/// arguments, e.g. `deployment vector wait-for --stage=Dev/A --output=json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliCommand {
    args: Vec<String>,
}

impl CliCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a bare argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a `--name=value` flag.
    #[must_use]
    pub fn flag(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("--{name}={value}"));
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Value of the first `--name=value` flag, if present.
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        let prefix = format!("--{name}=");
        self.args.iter().find_map(|a| a.strip_prefix(&prefix))
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join(" "))
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Port for running the external deployment CLI.
///
/// Implementations run the command to completion and capture its output. A
/// non-zero exit status must be reported as [`CliError::Failed`] with both
/// captured streams, so callers can still surface partial output.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &CliCommand) -> Result<ProcessOutput, CliError>;
}

/// Run a command and decode its stdout as JSON.
///
/// Execution failures take precedence over decode failures.
pub async fn run_json<T: DeserializeOwned>(
    executor: &dyn CommandExecutor,
    command: &CliCommand,
) -> Result<T, CliError> {
    let output = executor.execute(command).await?;
    serde_json::from_str(&output.stdout).map_err(|source| CliError::Decode {
        source,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Run a command and return its raw stdout.
pub async fn run_text(executor: &dyn CommandExecutor, command: &CliCommand) -> Result<String, CliError> {
    executor.execute(command).await.map(|output| output.stdout)
}
