//! Watch state of a single promoted stage.

use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::FutureExt;

use crate::domain::errors::{StageWatchError, WatchCause};
use crate::domain::models::output_sink::{SharedBuffer, SyncedWriter, TeeWriter};
use crate::domain::models::promotion::{
    PromotionResultEntry, PromotionStatus, WaitForDeploymentResponse,
};
use crate::domain::models::watch_policy::WatchResult;
use crate::domain::ports::{run_json, run_text, CommandExecutor, WatchTarget};
use crate::infrastructure::dwc::commands;

use super::usage_lease::UsageLease;

pub const SUCCESS_STATUS_MESSAGE: &str =
    "Promotion result is in state success. Seems like nothing changed. Skip watching stage.";
pub const NO_LANDSCAPE_MESSAGE: &str =
    "no deployment was started for vector. Therefore, no landscape is provided";

pub const RESULT_SUCCEEDED: &str = "succeeded";
pub const RESULT_FAILED: &str = "failed";
pub const RESULT_UNKNOWN: &str = "is in unknown result state";

/// Per-call settings shared by every stage worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSettings {
    /// Resource the watch is restricted to, if any
    pub resource_of_interest: Option<String>,
    /// Usage name placed on watched vectors
    pub usage_name: String,
    /// Deployment CLI binary, for manual cleanup hints
    pub cli_binary: String,
}

impl WatchSettings {
    pub fn for_target(
        target: &dyn WatchTarget,
        usage_name: impl Into<String>,
        cli_binary: impl Into<String>,
    ) -> Self {
        Self {
            resource_of_interest: target
                .watch_roi_only()
                .then(|| target.resource_name().to_string()),
            usage_name: usage_name.into(),
            cli_binary: cli_binary.into(),
        }
    }
}

/// One stage's promotion result together with its watch outcome and log.
///
/// Only the worker owning the stage drives [`BufferEntry::watch`]; the
/// orchestrator reads the entry after the worker has finished.
pub struct BufferEntry {
    result: PromotionResultEntry,
    failed: AtomicBool,
    log: SharedBuffer,
    err_writer: Mutex<TeeWriter<SyncedWriter, SharedBuffer>>,
}

impl BufferEntry {
    /// Errors are written to `live` as they happen and kept in the entry's log.
    pub fn new(result: PromotionResultEntry, live: SyncedWriter) -> Self {
        let log = SharedBuffer::new();
        Self {
            result,
            failed: AtomicBool::new(false),
            err_writer: Mutex::new(TeeWriter::new(live, log.clone())),
            log,
        }
    }

    pub const fn promotion_result(&self) -> &PromotionResultEntry {
        &self.result
    }

    pub fn stage(&self) -> &str {
        &self.result.stage
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Accumulated log of this stage.
    pub fn log_bytes(&self) -> Vec<u8> {
        self.log.contents()
    }

    /// Mark the stage failed and emit the error to the live sink and the log.
    pub fn report_error(&self, error: &StageWatchError) {
        self.failed.store(true, Ordering::SeqCst);
        tracing::debug!(stage = %self.stage(), error = %error, "Stage watch failed");
        self.emit(error);
    }

    /// Emit an error without changing the stage's outcome.
    pub fn report_note(&self, error: &StageWatchError) {
        tracing::warn!(stage = %self.stage(), error = %error, "Stage watch cleanup failed");
        self.emit(error);
    }

    fn emit(&self, message: &dyn fmt::Display) {
        let line = format!("{message}\n");
        let mut writer = self.err_writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writer.write_all(line.as_bytes()) {
            tracing::warn!(stage = %self.result.stage, error = %err, "Failed to write stage watch error");
        }
    }

    fn append_log(&self, bytes: &[u8]) -> io::Result<()> {
        self.log.clone().write_all(bytes)
    }

    /// Append watch output to `log`, reporting a failed write against the stage.
    fn keep_logs<W: Write>(&self, mut log: W, bytes: &[u8], what: &str) {
        if let Err(err) = log.write_all(bytes) {
            self.report_error(&StageWatchError::watch(
                self.stage(),
                WatchCause::Message(format!("unable to print {what}: {err}")),
            ));
        }
    }

    /// Append `message` to the log, reporting a failed write against `status`.
    fn log_message(&self, message: &str, status: &PromotionStatus) {
        if let Err(err) = self.append_log(message.as_bytes()) {
            self.report_error(&StageWatchError::watch(
                self.stage(),
                WatchCause::Message(format!(
                    "unable to print logs. Promotion result nevertheless is in state {status}: {err}"
                )),
            ));
        }
    }

    /// Drive this stage to a terminal state.
    pub async fn watch(&self, executor: &dyn CommandExecutor, settings: &WatchSettings) {
        tracing::debug!(stage = %self.stage(), status = %self.result.status, vector = %self.result.vector_id, "Watching stage");
        match &self.result.status {
            PromotionStatus::Created if self.result.is_orbit_stage() => {
                let message = format!(
                    "Your orbit deployment to {} was created. Watching orbit deployments while they are in-flight is currently not supported. Skip watching.",
                    self.stage()
                );
                self.log_message(&message, &self.result.status);
            }
            PromotionStatus::Created => self.watch_vector_deployment(executor, settings).await,
            PromotionStatus::Success => {
                self.log_message(SUCCESS_STATUS_MESSAGE, &self.result.status);
            }
            PromotionStatus::Error => {
                let message = format!(
                    "promotion result is in state error. No vector deployment was triggered. The error is: {}",
                    self.result.error.as_deref().unwrap_or_default()
                );
                self.report_error(&StageWatchError::watch(self.stage(), WatchCause::Message(message)));
            }
            PromotionStatus::Unknown(raw) => {
                let message = format!(
                    "promotion result is in unknown state {raw}. Please contact the deployment platform team"
                );
                self.report_error(&StageWatchError::watch(self.stage(), WatchCause::Message(message)));
            }
        }
        tracing::info!(stage = %self.stage(), result = self.print_result(), "Stage watch finished");
    }

    async fn watch_vector_deployment(&self, executor: &dyn CommandExecutor, settings: &WatchSettings) {
        let stage = self.stage();
        let vector_id = self.result.vector_id.as_str();

        let wait_for = commands::wait_for_deployment(stage, vector_id);
        let landscape = match run_json::<WaitForDeploymentResponse>(executor, &wait_for).await {
            Ok(response) if response.landscape.is_empty() => {
                self.report_error(&StageWatchError::pre_watch(
                    stage,
                    WatchCause::Message(NO_LANDSCAPE_MESSAGE.to_string()),
                ));
                return;
            }
            Ok(response) => response.landscape,
            Err(err) => {
                self.report_error(&StageWatchError::pre_watch(stage, err));
                return;
            }
        };

        let lease =
            match UsageLease::acquire(executor, &landscape, vector_id, &settings.usage_name).await {
                Ok(lease) => lease,
                Err(err) => {
                    self.report_error(&StageWatchError::pre_watch(stage, err));
                    return;
                }
            };

        let watched = AssertUnwindSafe(self.run_watch(executor, &landscape, settings))
            .catch_unwind()
            .await;

        if let Err(err) = lease.release(executor).await {
            let message = lease.release_failure_message(stage, &settings.cli_binary, &err);
            self.report_note(&StageWatchError::post_watch(stage, WatchCause::Message(message)));
        }

        if let Err(payload) = watched {
            panic::resume_unwind(payload);
        }
    }

    async fn run_watch(&self, executor: &dyn CommandExecutor, landscape: &str, settings: &WatchSettings) {
        let stage = self.stage();
        let command = commands::watch_vector_deployment(
            landscape,
            &self.result.vector_id,
            settings.resource_of_interest.as_deref(),
        );
        tracing::info!(stage, landscape, vector = %self.result.vector_id, "Watching vector deployment");

        match run_text(executor, &command).await {
            Ok(live_logs) => self.keep_logs(self.log.clone(), live_logs.as_bytes(), "live logs"),
            Err(err) => {
                if let Some(partial) = err.captured_stdout() {
                    self.keep_logs(self.log.clone(), partial.as_bytes(), "partial live logs");
                }
                self.report_error(&StageWatchError::watch(stage, err));
            }
        }
    }

    /// Result token shown in the report's status line.
    pub fn print_result(&self) -> &'static str {
        if self.is_failed() {
            return RESULT_FAILED;
        }
        if self.result.is_orbit_stage() && self.result.status == PromotionStatus::Created {
            return RESULT_UNKNOWN;
        }
        RESULT_SUCCEEDED
    }

    /// Status line naming stage, vector and result.
    pub fn status_line(&self, settings: &WatchSettings) -> String {
        match &settings.resource_of_interest {
            Some(resource) => format!(
                "Deployment of resource {resource} to stage {} with current vector {} {}.",
                self.stage(),
                self.result.vector_id,
                self.print_result()
            ),
            None => format!(
                "Deployment to stage {} with current vector {} {}.",
                self.stage(),
                self.result.vector_id,
                self.print_result()
            ),
        }
    }
}

impl fmt::Debug for BufferEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferEntry")
            .field("result", &self.result)
            .field("failed", &self.is_failed())
            .field("log_len", &self.log.len())
            .finish_non_exhaustive()
    }
}

impl WatchResult for BufferEntry {
    fn succeeded(&self) -> bool {
        !self.is_failed()
    }

    fn stage_name(&self) -> &str {
        self.stage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CliError;
    use crate::services::stage_watch::test_support::{cli_failure, healthy_platform, MockExecutor};

    fn settings() -> WatchSettings {
        WatchSettings {
            resource_of_interest: None,
            usage_name: "stageRelease".into(),
            cli_binary: "dwc".into(),
        }
    }

    fn entry(result: PromotionResultEntry) -> (BufferEntry, SharedBuffer) {
        let live = SharedBuffer::new();
        (BufferEntry::new(result, SyncedWriter::new(live.clone())), live)
    }

    fn log_text(entry: &BufferEntry) -> String {
        String::from_utf8(entry.log_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_success_status_runs_no_commands() {
        let executor = MockExecutor::new(healthy_platform);
        let (entry, live) = entry(PromotionResultEntry::new("Dev/B", PromotionStatus::Success, "v2"));

        entry.watch(&executor, &settings()).await;

        assert!(executor.calls().is_empty());
        assert!(entry.succeeded());
        assert_eq!(entry.print_result(), RESULT_SUCCEEDED);
        assert_eq!(log_text(&entry), SUCCESS_STATUS_MESSAGE);
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_reports_promotion_error() {
        let executor = MockExecutor::new(healthy_platform);
        let (entry, live) = entry(
            PromotionResultEntry::new("Dev/C", PromotionStatus::Error, "v3").with_error("boom"),
        );

        entry.watch(&executor, &settings()).await;

        assert!(executor.calls().is_empty());
        assert!(!entry.succeeded());
        assert_eq!(entry.print_result(), RESULT_FAILED);
        let expected = "failed watching stage Dev/C: promotion result is in state error. No vector deployment was triggered. The error is: boom\n";
        assert_eq!(log_text(&entry), expected);
        assert_eq!(live.contents_lossy(), expected);
    }

    #[tokio::test]
    async fn test_unknown_status_fails() {
        let executor = MockExecutor::new(healthy_platform);
        let (entry, _) = entry(PromotionResultEntry::new(
            "Dev/D",
            PromotionStatus::Unknown("Pending".into()),
            "v4",
        ));

        entry.watch(&executor, &settings()).await;

        assert!(executor.calls().is_empty());
        assert!(entry.is_failed());
        assert!(log_text(&entry).contains("promotion result is in unknown state Pending"));
    }

    #[tokio::test]
    async fn test_orbit_stage_is_skipped_with_unknown_result() {
        let executor = MockExecutor::new(healthy_platform);
        let (entry, _) = entry(PromotionResultEntry::new("orbit/eu", PromotionStatus::Created, "v5"));

        entry.watch(&executor, &settings()).await;

        assert!(executor.calls().is_empty());
        assert!(entry.succeeded());
        assert_eq!(entry.print_result(), RESULT_UNKNOWN);
        assert!(log_text(&entry).starts_with("Your orbit deployment to orbit/eu was created."));
    }

    #[tokio::test]
    async fn test_created_stage_watches_with_lease() {
        let executor = MockExecutor::new(healthy_platform);
        let (entry, _) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        entry.watch(&executor, &settings()).await;

        let subcommands: Vec<String> = executor.calls().iter().map(|c| c.args()[2].clone()).collect();
        assert_eq!(subcommands, ["wait-for", "add-usage", "watch", "remove-usage"]);
        assert!(entry.succeeded());
        assert_eq!(log_text(&entry), "ok");
    }

    #[tokio::test]
    async fn test_empty_landscape_fails_before_lease() {
        let executor = MockExecutor::new(|cmd| match cmd.args()[2].as_str() {
            "wait-for" => Ok(r#"{"landscape":""}"#.to_string()),
            _ => Ok(String::new()),
        });
        let (entry, _) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        entry.watch(&executor, &settings()).await;

        assert_eq!(executor.calls().len(), 1);
        assert!(entry.is_failed());
        assert_eq!(
            log_text(&entry),
            format!("failed to start watching stage Dev/A: {NO_LANDSCAPE_MESSAGE}\n")
        );
    }

    #[tokio::test]
    async fn test_failed_add_usage_skips_watch_and_release() {
        let executor = MockExecutor::new(|cmd| match cmd.args()[2].as_str() {
            "wait-for" => Ok(r#"{"landscape":"eu10"}"#.to_string()),
            "add-usage" => Err(cli_failure("locked")),
            _ => Ok(String::new()),
        });
        let (entry, _) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        entry.watch(&executor, &settings()).await;

        assert!(entry.is_failed());
        assert!(executor.calls_to("watch").is_empty());
        assert!(executor.calls_to("remove-usage").is_empty());
        assert!(log_text(&entry).starts_with("failed to start watching stage Dev/A:"));
    }

    #[tokio::test]
    async fn test_failed_watch_keeps_partial_logs_and_releases_lease() {
        let executor = MockExecutor::new(|cmd| match cmd.args()[2].as_str() {
            "wait-for" => Ok(r#"{"landscape":"eu10"}"#.to_string()),
            "watch" => Err(CliError::Failed {
                exit_code: 1,
                stderr: "timeout".into(),
                stdout: "partial logs\n".into(),
            }),
            _ => Ok(String::new()),
        });
        let (entry, _) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        entry.watch(&executor, &settings()).await;

        assert!(entry.is_failed());
        assert_eq!(executor.calls_to("remove-usage").len(), 1);
        let log = log_text(&entry);
        assert!(log.starts_with("partial logs\nfailed watching stage Dev/A:"));
        assert!(log.contains("timeout"));
    }

    #[tokio::test]
    async fn test_panicking_watch_still_releases_lease() {
        let executor = MockExecutor::new(|cmd| match cmd.args()[2].as_str() {
            "watch" => panic!("watch exploded"),
            _ => healthy_platform(cmd),
        });
        let (entry, _) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        let outcome = AssertUnwindSafe(entry.watch(&executor, &settings()))
            .catch_unwind()
            .await;

        assert!(outcome.is_err(), "panic must reach the worker");
        let added = executor.calls_to("add-usage");
        let removed = executor.calls_to("remove-usage");
        assert_eq!(added.len(), 1);
        assert_eq!(removed.len(), 1);
        assert_eq!(added[0].flag_value("expiresAt"), removed[0].flag_value("expiresAt"));
    }

    struct BrokenLog;

    impl Write for BrokenLog {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "log closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unwritable_log_is_reported() {
        let (entry, live) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        entry.keep_logs(BrokenLog, b"partial logs\n", "partial live logs");

        assert!(entry.is_failed());
        let live = live.contents_lossy();
        assert!(live.contains("failed watching stage Dev/A: unable to print partial live logs"));
        assert!(live.contains("log closed"));
    }

    #[tokio::test]
    async fn test_failed_release_does_not_flip_success() {
        let executor = MockExecutor::new(|cmd| match cmd.args()[2].as_str() {
            "remove-usage" => Err(cli_failure("gone")),
            _ => healthy_platform(cmd),
        });
        let (entry, live) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));

        entry.watch(&executor, &settings()).await;

        assert!(entry.succeeded());
        assert_eq!(entry.print_result(), RESULT_SUCCEEDED);
        let log = log_text(&entry);
        assert!(log.contains("failed to perform cleanup tasks after watching stage Dev/A"));
        assert!(log.contains("dwc deployment vector remove-usage -h"));
        assert!(live.contents_lossy().contains("failed to remove usage stageRelease"));
    }

    #[test]
    fn test_status_lines() {
        let (entry, _) = entry(PromotionResultEntry::new("Dev/A", PromotionStatus::Created, "v1"));
        assert_eq!(
            entry.status_line(&settings()),
            "Deployment to stage Dev/A with current vector v1 succeeded."
        );

        let roi = WatchSettings {
            resource_of_interest: Some("my-service".into()),
            ..settings()
        };
        assert_eq!(
            entry.status_line(&roi),
            "Deployment of resource my-service to stage Dev/A with current vector v1 succeeded."
        );
    }
}
