//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stage-release")]
#[command(about = "Upload an artifact and watch its deployments to every promoted stage", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file, replaces .stage-release/config.yaml and local.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload the configured artifact and watch the promoted stages
    Release(ReleaseArgs),

    /// Watch the deployments of an earlier upload
    Watch(WatchArgs),

    /// List the available stage watch policies
    Policies,
}

#[derive(Args, Debug, Default)]
pub struct ReleaseArgs {
    /// Stages to watch, overrides the configuration (`*` for all)
    #[arg(short, long = "stage", value_delimiter = ',')]
    pub stages: Vec<String>,

    /// Stage watch policy, overrides the configuration
    #[arg(short, long)]
    pub policy: Option<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// JSON file with the promotion results or the complete upload response
    #[arg(long)]
    pub promotion_results: PathBuf,

    /// Stage watch policy, overrides the configuration
    #[arg(short, long)]
    pub policy: Option<String>,
}
