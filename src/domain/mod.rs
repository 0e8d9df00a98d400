//! Domain layer for stage-release
//!
//! Promotion results, watch policies, artifact descriptors and the ports the
//! services depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{
    CliError, DescriptorError, StageWatchError, UploadError, WatchCause, WatchRunError,
};
