//! Concurrent watch over the stages an upload was promoted to.
//!
//! Each promoted stage gets a [`BufferEntry`] driven on its own task. Errors
//! reach the shared sink live while the watches run; once all of them have
//! finished, an ordered report is written and the target's
//! [`StageWatchPolicy`](crate::domain::models::StageWatchPolicy) decides the
//! overall verdict.

pub mod buffer_entry;
pub mod orchestrator;
pub mod report;
pub mod usage_lease;
pub mod watch_buffer;

#[cfg(test)]
pub(crate) mod test_support;

pub use buffer_entry::{BufferEntry, WatchSettings};
pub use orchestrator::DefaultStageWatchOrchestrator;
pub use usage_lease::UsageLease;
pub use watch_buffer::WatchBuffer;
