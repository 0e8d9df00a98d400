pub mod artifact;
pub mod config;
pub mod output_sink;
pub mod promotion;
pub mod watch_policy;

pub use artifact::{Artifact, ArtifactKind, WATCH_ALL_STAGES};
pub use config::{ArtifactConfig, CliConfig, Config, LoggingConfig, WatchConfig};
pub use output_sink::{SharedBuffer, SyncedWriter, TeeWriter};
pub use promotion::{
    ArtifactUploadResponse, PromotionResultEntry, PromotionStatus, WaitForDeploymentResponse,
    ORBIT_STAGE_PREFIX,
};
pub use watch_policy::{StageWatchPolicy, WatchResult, AVAILABLE_POLICIES};
