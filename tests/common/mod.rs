//! Common test utilities for integration tests
//!
//! A scripted deployment CLI and helpers shared across the integration test files.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stage_release::domain::ports::{CliCommand, CommandExecutor, ProcessOutput};
use stage_release::CliError;

type Script = dyn Fn(&CliCommand) -> Result<String, CliError> + Send + Sync;

/// Deployment CLI double answering from a script and recording every call.
pub struct ScriptedCli {
    script: Box<Script>,
    latency: Mutex<Vec<(String, Duration)>>,
    calls: Mutex<Vec<CliCommand>>,
}

impl ScriptedCli {
    pub fn new(
        script: impl Fn(&CliCommand) -> Result<String, CliError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            latency: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Delay every `watch` of `vector` by `delay`.
    pub fn slow_watch(&self, vector: &str, delay: Duration) {
        self.latency.lock().unwrap().push((vector.to_string(), delay));
    }

    pub fn calls(&self) -> Vec<CliCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls of `<group> <subgroup> <subcommand>`.
    pub fn calls_to(&self, subcommand: &str) -> Vec<CliCommand> {
        self.calls()
            .into_iter()
            .filter(|c| subcommand_of(c) == Some(subcommand))
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedCli {
    async fn execute(&self, command: &CliCommand) -> Result<ProcessOutput, CliError> {
        self.calls.lock().unwrap().push(command.clone());

        let delay = if subcommand_of(command) == Some("watch") {
            let vector = command.flag_value("vector").unwrap_or_default().to_string();
            self.latency
                .lock()
                .unwrap()
                .iter()
                .find(|(v, _)| *v == vector)
                .map(|(_, d)| *d)
        } else {
            None
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        (self.script)(command).map(ProcessOutput::stdout)
    }
}

pub fn subcommand_of(command: &CliCommand) -> Option<&str> {
    command.args().get(2).map(String::as_str)
}

/// A platform where every deployment lands in `eu10` and streams `deployed`.
pub fn healthy_platform(upload_response: &'static str) -> Arc<ScriptedCli> {
    ScriptedCli::new(move |command| match subcommand_of(command) {
        Some("wait-for") => Ok(r#"{"landscape":"eu10"}"#.to_string()),
        Some("watch") => Ok(format!(
            "deployed {}",
            command.flag_value("vector").unwrap_or_default()
        )),
        Some("add-usage" | "remove-usage") => Ok(String::new()),
        _ if command.args().first().map(String::as_str) == Some("artifact") => {
            Ok(upload_response.to_string())
        }
        _ => Err(failure("unexpected command")),
    })
}

pub fn failure(stderr: &str) -> CliError {
    CliError::Failed {
        exit_code: 1,
        stderr: stderr.to_string(),
        stdout: String::new(),
    }
}

/// Position of `needle` in `haystack`, panicking when it is missing.
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
}
