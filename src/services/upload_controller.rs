//! Artifact upload followed by a watch over the promoted stages.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::errors::UploadError;
use crate::domain::models::artifact::WATCH_ALL_STAGES;
use crate::domain::models::output_sink::SyncedWriter;
use crate::domain::models::promotion::{ArtifactUploadResponse, PromotionResultEntry};
use crate::domain::ports::{run_json, ArtifactDescriptor, CommandExecutor, StageWatchOrchestrator};

/// Stages selected for watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSelection {
    pub stages: Vec<PromotionResultEntry>,
    /// The `*` selector was declared
    pub all_stages: bool,
    /// Declared stages without a promotion result, each named once
    pub missing: Vec<String>,
}

/// Select the promotion results matching the declared stage names.
///
/// `*` selects everything. Otherwise the upload response's order is kept and
/// each promotion result is selected at most once.
pub fn filter_stages_to_watch(
    declared: &[String],
    promotion_results: &[PromotionResultEntry],
) -> StageSelection {
    if declared.iter().any(|stage| stage == WATCH_ALL_STAGES) {
        return StageSelection {
            stages: promotion_results.to_vec(),
            all_stages: true,
            missing: Vec::new(),
        };
    }

    let declared_once: BTreeSet<&str> = declared.iter().map(String::as_str).collect();
    StageSelection {
        stages: promotion_results
            .iter()
            .filter(|result| declared_once.contains(result.stage.as_str()))
            .cloned()
            .collect(),
        all_stages: false,
        missing: declared_once
            .into_iter()
            .filter(|stage| !promotion_results.iter().any(|r| r.stage == *stage))
            .map(str::to_string)
            .collect(),
    }
}

/// Drives an upload and the stage watch that follows it.
pub struct UploadController {
    executor: Arc<dyn CommandExecutor>,
    orchestrator: Arc<dyn StageWatchOrchestrator>,
    sink: SyncedWriter,
}

impl UploadController {
    /// Controller reporting to stdout.
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        orchestrator: Arc<dyn StageWatchOrchestrator>,
    ) -> Self {
        Self::with_sink(executor, orchestrator, SyncedWriter::stdout())
    }

    pub fn with_sink(
        executor: Arc<dyn CommandExecutor>,
        orchestrator: Arc<dyn StageWatchOrchestrator>,
        sink: SyncedWriter,
    ) -> Self {
        Self {
            executor,
            orchestrator,
            sink,
        }
    }

    /// Upload the artifact and watch the declared stages.
    ///
    /// Returns the full, unfiltered upload response.
    pub async fn upload_artifact<D: ArtifactDescriptor>(
        &self,
        descriptor: &D,
    ) -> Result<ArtifactUploadResponse, UploadError> {
        let command = descriptor.build_upload_command()?;
        tracing::info!(resource = descriptor.resource_name(), "Uploading artifact");

        let response: ArtifactUploadResponse = run_json(self.executor.as_ref(), &command)
            .await
            .map_err(UploadError::UploadCommand)?;
        tracing::info!(
            vector = %response.created_vector,
            promotions = response.promotion_result.len(),
            "Artifact uploaded"
        );

        self.watch_deployments(&response, descriptor).await?;
        Ok(response)
    }

    async fn watch_deployments<D: ArtifactDescriptor>(
        &self,
        response: &ArtifactUploadResponse,
        descriptor: &D,
    ) -> Result<(), UploadError> {
        if !descriptor.has_stages_to_watch() {
            tracing::debug!("No stages to watch. Skip watching stages");
            return Ok(());
        }

        let declared = descriptor.stages_to_watch();
        let selection = filter_stages_to_watch(declared, &response.promotion_result);
        if !selection.missing.is_empty() {
            let triggered: Vec<&str> = response
                .promotion_result
                .iter()
                .map(|r| r.stage.as_str())
                .collect();
            let selected: Vec<&str> = selection.stages.iter().map(|r| r.stage.as_str()).collect();
            tracing::warn!(
                declared = ?declared,
                missing = ?selection.missing,
                triggered = ?triggered,
                selected = ?selected,
                "Promotion was not triggered for all stages to watch. Watching the stages that were promoted"
            );
        }

        self.orchestrator
            .watch_vector_deployments(
                &selection.stages,
                self.sink.clone(),
                Arc::clone(&self.executor),
                descriptor,
            )
            .await?;
        Ok(())
    }
}
