//! CLI command implementations.

pub mod policies;
pub mod release;
pub mod watch;
