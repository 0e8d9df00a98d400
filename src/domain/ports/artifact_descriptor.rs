use crate::domain::errors::DescriptorError;
use crate::domain::models::watch_policy::StageWatchPolicy;

use super::command_executor::CliCommand;

/// The part of an artifact descriptor the stage watch depends on.
pub trait WatchTarget: Send + Sync {
    /// Restrict the live watch (and status lines) to the descriptor's resource.
    fn watch_roi_only(&self) -> bool;

    fn resource_name(&self) -> &str;

    fn stage_watch_policy(&self) -> &StageWatchPolicy;
}

/// Port for artifact descriptors driving an upload.
pub trait ArtifactDescriptor: WatchTarget {
    /// Stage names the user asked to watch. `*` selects all promoted stages.
    fn stages_to_watch(&self) -> &[String];

    fn has_stages_to_watch(&self) -> bool {
        !self.stages_to_watch().is_empty()
    }

    /// Build the `artifact upload` command for this descriptor.
    fn build_upload_command(&self) -> Result<CliCommand, DescriptorError>;
}
