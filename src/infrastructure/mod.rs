//! Infrastructure layer module
//!
//! Adapters for the outside world:
//! - Deployment CLI command builders and process executor
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod dwc;
pub mod logging;
