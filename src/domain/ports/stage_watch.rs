use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::WatchRunError;
use crate::domain::models::promotion::PromotionResultEntry;
use crate::domain::models::output_sink::SyncedWriter;

use super::artifact_descriptor::WatchTarget;
use super::command_executor::CommandExecutor;

/// Port for watching the deployments triggered by one upload.
///
/// Every promotion result is watched concurrently. Live progress and the
/// ordered final report both go to `sink`. The call fails only when the
/// final report cannot be written or the target's policy rejects the
/// aggregate outcome.
#[async_trait]
pub trait StageWatchOrchestrator: Send + Sync {
    async fn watch_vector_deployments(
        &self,
        promotion_results: &[PromotionResultEntry],
        sink: SyncedWriter,
        executor: Arc<dyn CommandExecutor>,
        target: &dyn WatchTarget,
    ) -> Result<(), WatchRunError>;
}
