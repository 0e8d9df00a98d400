use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::errors::CliError;
use crate::domain::ports::{CliCommand, CommandExecutor, ProcessOutput};

/// Runs deployment CLI commands as child processes.
#[derive(Debug, Clone)]
pub struct ProcessCommandExecutor {
    program: PathBuf,
}

impl ProcessCommandExecutor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(&self, command: &CliCommand) -> Result<ProcessOutput, CliError> {
        tracing::debug!(program = %self.program.display(), command = %command, "Executing deployment CLI command");

        let output = Command::new(&self.program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| {
                tracing::error!(program = %self.program.display(), error = %source, "Failed to spawn deployment CLI");
                CliError::Spawn {
                    program: self.program_name(),
                    source,
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            // Terminated by signal when there is no exit code
            let exit_code = output.status.code().unwrap_or(-1);
            tracing::debug!(command = %command, exit_code, "Deployment CLI command failed");
            return Err(CliError::Failed {
                exit_code,
                stderr,
                stdout,
            });
        }

        Ok(ProcessOutput { stdout, stderr })
    }
}
