use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::domain::errors::{StageWatchError, WatchCause, WatchRunError};
use crate::domain::models::output_sink::SyncedWriter;
use crate::domain::models::promotion::PromotionResultEntry;
use crate::domain::ports::{CommandExecutor, StageWatchOrchestrator, WatchTarget};

use super::buffer_entry::{BufferEntry, WatchSettings};
use super::report;
use super::watch_buffer::WatchBuffer;

pub const DEFAULT_USAGE_NAME: &str = "stageRelease";
pub const DEFAULT_CLI_BINARY: &str = "dwc";

/// Watches every promoted stage on its own tokio task.
///
/// Holds no per-call state: each call works on a fresh [`WatchBuffer`].
#[derive(Debug, Clone)]
pub struct DefaultStageWatchOrchestrator {
    usage_name: String,
    cli_binary: String,
}

impl DefaultStageWatchOrchestrator {
    pub fn new(usage_name: impl Into<String>, cli_binary: impl Into<String>) -> Self {
        Self {
            usage_name: usage_name.into(),
            cli_binary: cli_binary.into(),
        }
    }

    fn populate(
        promotion_results: &[PromotionResultEntry],
        sink: &SyncedWriter,
    ) -> WatchBuffer {
        let buffer = WatchBuffer::with_len(promotion_results.len());
        for (index, result) in promotion_results.iter().enumerate() {
            buffer.set(index, Arc::new(BufferEntry::new(result.clone(), sink.clone())));
        }
        buffer
    }
}

impl Default for DefaultStageWatchOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_USAGE_NAME, DEFAULT_CLI_BINARY)
    }
}

#[async_trait]
impl StageWatchOrchestrator for DefaultStageWatchOrchestrator {
    async fn watch_vector_deployments(
        &self,
        promotion_results: &[PromotionResultEntry],
        sink: SyncedWriter,
        executor: Arc<dyn CommandExecutor>,
        target: &dyn WatchTarget,
    ) -> Result<(), WatchRunError> {
        let settings = Arc::new(WatchSettings::for_target(
            target,
            self.usage_name.as_str(),
            self.cli_binary.as_str(),
        ));
        let buffer = Self::populate(promotion_results, &sink);

        tracing::info!(stages = buffer.len(), "Watching promoted stages");

        let workers: Vec<_> = buffer
            .to_watch_results()
            .into_iter()
            .map(|entry| {
                let executor = Arc::clone(&executor);
                let settings = Arc::clone(&settings);
                tokio::spawn(async move { entry.watch(executor.as_ref(), &settings).await })
            })
            .collect();

        for (index, outcome) in join_all(workers).await.into_iter().enumerate() {
            let Err(join_error) = outcome else { continue };
            if let Some(entry) = buffer.get(index) {
                tracing::error!(stage = %entry.stage(), error = %join_error, "Stage watch worker terminated unexpectedly");
                entry.report_error(&StageWatchError::watch(
                    entry.stage(),
                    WatchCause::Message(format!("stage watch worker terminated unexpectedly: {join_error}")),
                ));
            }
        }

        let entries = buffer.to_watch_results();
        let mut sink = sink;
        report::write_report(&mut sink, &entries, &settings).map_err(|err| {
            tracing::error!(error = %err, "Failed to write stage watch results");
            WatchRunError::ReportWrite(err)
        })?;

        let policy = target.stage_watch_policy();
        let verdict = policy.evaluate(&entries);
        match &verdict {
            Ok(()) => tracing::info!(policy = %policy, "Stage watch policy satisfied"),
            Err(err) => tracing::warn!(policy = %policy, error = %err, "Stage watch policy violated"),
        }
        verdict
    }
}
