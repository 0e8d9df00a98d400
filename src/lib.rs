//! stage-release - upload an artifact and watch its stage promotions
//!
//! Uploads a build artifact through the deployment platform CLI, then follows
//! every vector deployment the upload triggered, one concurrent worker per
//! stage, and judges the outcome with a configurable stage watch policy.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): promotion results, policies, artifact descriptors and ports
//! - **Service Layer** (`services`): stage watch orchestration and the upload controller
//! - **Infrastructure Layer** (`infrastructure`): process execution, configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stage_release::{ConfigLoader, DefaultStageWatchOrchestrator, ProcessCommandExecutor, UploadController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let artifact = ConfigLoader::artifact(&config)?;
//!     let controller = UploadController::new(
//!         Arc::new(ProcessCommandExecutor::new("dwc")),
//!         Arc::new(DefaultStageWatchOrchestrator::default()),
//!     );
//!     controller.upload_artifact(&artifact).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{CliError, DescriptorError, StageWatchError, UploadError, WatchRunError};
pub use domain::models::{
    Artifact, ArtifactKind, ArtifactUploadResponse, Config, PromotionResultEntry, PromotionStatus,
    StageWatchPolicy, SyncedWriter,
};
pub use domain::ports::{
    ArtifactDescriptor, CliCommand, CommandExecutor, StageWatchOrchestrator, WatchTarget,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::dwc::ProcessCommandExecutor;
pub use services::{DefaultStageWatchOrchestrator, UploadController};
