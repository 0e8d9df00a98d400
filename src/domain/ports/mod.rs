//! Port trait definitions (Hexagonal Architecture)
//!
//! - `CommandExecutor`: runs the external deployment CLI
//! - `WatchTarget` / `ArtifactDescriptor`: what an upload and its stage watch need
//!   to know about an artifact
//! - `StageWatchOrchestrator`: concurrent watch over promoted stages

pub mod artifact_descriptor;
pub mod command_executor;
pub mod stage_watch;

pub use artifact_descriptor::{ArtifactDescriptor, WatchTarget};
pub use command_executor::{run_json, run_text, CliCommand, CommandExecutor, ProcessOutput};
pub use stage_watch::StageWatchOrchestrator;
