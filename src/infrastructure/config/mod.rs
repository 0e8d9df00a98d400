//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - Artifact descriptor construction

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
