//! Command line interface
//!
//! - `release`: upload the configured artifact and watch the promoted stages
//! - `watch`: watch the promotion results of an earlier upload
//! - `policies`: list the available stage watch policies

pub mod commands;
pub mod output;
pub mod types;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::models::config::Config;
use crate::domain::models::output_sink::SyncedWriter;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

pub use output::{handle_error, output, CommandOutput};
pub use types::{Cli, Commands};

/// Load the configuration from `path`, or from the project hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &Config, verbose: bool) -> Result<LoggerImpl> {
    let mut log_config = LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::msg)
        .context("Invalid logging configuration")?;
    if verbose {
        log_config.level = "debug".to_string();
    }
    LoggerImpl::init(&log_config)
}

/// Destination of the live stage watch output and final report.
///
/// Stdout, unless stdout carries JSON output.
pub fn report_sink(json_mode: bool) -> SyncedWriter {
    if json_mode {
        SyncedWriter::new(io::stderr())
    } else {
        SyncedWriter::stdout()
    }
}
