use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::errors::DescriptorError;
use crate::domain::models::artifact::{Artifact, ArtifactKind};
use crate::domain::models::config::Config;
use crate::domain::models::watch_policy::StageWatchPolicy;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CLI binary path cannot be empty")]
    EmptyBinaryPath,

    #[error("Usage name cannot be empty")]
    EmptyUsageName,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Invalid stage watch configuration: {0}")]
    InvalidWatchPolicy(#[source] DescriptorError),

    #[error("Invalid artifact configuration: {0}")]
    InvalidArtifact(#[source] DescriptorError),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .stage-release/config.yaml (project config)
    /// 3. .stage-release/local.yaml (project local overrides, optional)
    /// 4. Environment variables (STAGE_RELEASE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".stage-release/config.yaml"))
            .merge(Yaml::file(".stage-release/local.yaml"))
            .merge(Env::prefixed("STAGE_RELEASE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("STAGE_RELEASE_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// The artifact section is checked separately by [`ConfigLoader::artifact`],
    /// since commands that only watch do not need one.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.cli.binary_path.trim().is_empty() {
            return Err(ConfigError::EmptyBinaryPath);
        }
        if config.cli.usage_name.trim().is_empty() {
            return Err(ConfigError::EmptyUsageName);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        Self::policy(config)?;
        Ok(())
    }

    /// Resolve the configured stage watch policy
    pub fn policy(config: &Config) -> Result<StageWatchPolicy, ConfigError> {
        StageWatchPolicy::resolve(&config.watch.policy, &config.watch.required_successful_stages)
            .map_err(ConfigError::InvalidWatchPolicy)
    }

    /// Build the artifact descriptor described by the configuration
    pub fn artifact(config: &Config) -> Result<Artifact, ConfigError> {
        let kind: ArtifactKind = config
            .artifact
            .kind
            .parse()
            .map_err(ConfigError::InvalidArtifact)?;

        let artifact = Artifact {
            kind,
            resource_name: config.artifact.resource_name.clone(),
            app_names: config.artifact.app_names.clone(),
            artifact_url: config.artifact.artifact_url.clone(),
            files: config.artifact.files.clone(),
            upload_metadata: config.artifact.upload_metadata.clone(),
            additional_download_urls: config.artifact.additional_download_urls.clone(),
            stages_to_watch: config.watch.stages_to_watch.clone(),
            watch_roi_only: config.watch.watch_resource_of_interest,
            policy: Self::policy(config)?,
        };
        artifact.validate().map_err(ConfigError::InvalidArtifact)?;
        Ok(artifact)
    }
}
