//! Test doubles for the stage watch.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::CliError;
use crate::domain::ports::{CliCommand, CommandExecutor, ProcessOutput};

type Responder = dyn Fn(&CliCommand) -> Result<String, CliError> + Send + Sync;
type Delay = dyn Fn(&CliCommand) -> Option<Duration> + Send + Sync;

/// Executor answering from a closure and recording every command.
pub struct MockExecutor {
    responder: Box<Responder>,
    delay: Option<Box<Delay>>,
    calls: Arc<Mutex<Vec<CliCommand>>>,
}

impl MockExecutor {
    pub fn new(
        responder: impl Fn(&CliCommand) -> Result<String, CliError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(
        mut self,
        delay: impl Fn(&CliCommand) -> Option<Duration> + Send + Sync + 'static,
    ) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn calls(&self) -> Vec<CliCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded commands whose third argument is `subcommand`.
    pub fn calls_to(&self, subcommand: &str) -> Vec<CliCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.args().get(2).map(String::as_str) == Some(subcommand))
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(&self, command: &CliCommand) -> Result<ProcessOutput, CliError> {
        self.calls.lock().unwrap().push(command.clone());
        if let Some(delay) = self.delay.as_ref().and_then(|d| d(command)) {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(command).map(ProcessOutput::stdout)
    }
}

/// Responder for a healthy platform: landscape `eu10`, watch prints `ok`.
pub fn healthy_platform(command: &CliCommand) -> Result<String, CliError> {
    match command.args().get(2).map(String::as_str) {
        Some("wait-for") => Ok(r#"{"landscape":"eu10"}"#.to_string()),
        Some("watch") => Ok("ok".to_string()),
        _ => Ok(String::new()),
    }
}

pub fn cli_failure(stderr: &str) -> CliError {
    CliError::Failed {
        exit_code: 1,
        stderr: stderr.to_string(),
        stdout: String::new(),
    }
}
