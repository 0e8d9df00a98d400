//! Deployment CLI integration
//!
//! - Command builders for the `deployment vector` family
//! - A process based [`CommandExecutor`](crate::domain::ports::CommandExecutor)

pub mod commands;
pub mod executor;

pub use commands::STAGE_WATCH_LOCK_MINUTES;
pub use executor::ProcessCommandExecutor;
