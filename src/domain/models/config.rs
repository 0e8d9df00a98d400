use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Main configuration structure for stage-release
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Deployment CLI configuration
    #[serde(default)]
    pub cli: CliConfig,

    /// Artifact to upload
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// Stage watch configuration
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deployment CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CliConfig {
    /// Path to the deployment CLI executable
    #[serde(default = "default_binary_path")]
    pub binary_path: String,

    /// Usage name registered while a stage is being watched
    #[serde(default = "default_usage_name")]
    pub usage_name: String,
}

fn default_binary_path() -> String {
    "dwc".to_string()
}

fn default_usage_name() -> String {
    "stageRelease".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            usage_name: default_usage_name(),
        }
    }
}

/// Artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArtifactConfig {
    /// Artifact kind: ui, java, mta, docker, orbit, helm
    #[serde(default = "default_artifact_kind")]
    pub kind: String,

    /// Resource the artifact belongs to
    #[serde(default)]
    pub resource_name: String,

    /// Application names passed as `--appname`
    #[serde(default)]
    pub app_names: Vec<String>,

    /// Jar/MTA url or container image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_url: Option<String>,

    /// Uploaded file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,

    /// Additional `--metadata` key/value pairs
    #[serde(default)]
    pub upload_metadata: BTreeMap<String, String>,

    /// Additional download urls keyed by name
    #[serde(default)]
    pub additional_download_urls: BTreeMap<String, String>,
}

fn default_artifact_kind() -> String {
    "java".to_string()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            kind: default_artifact_kind(),
            resource_name: String::new(),
            app_names: vec![],
            artifact_url: None,
            files: None,
            upload_metadata: BTreeMap::new(),
            additional_download_urls: BTreeMap::new(),
        }
    }
}

/// Stage watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WatchConfig {
    /// Stages to watch after upload, `*` for all
    #[serde(default)]
    pub stages_to_watch: Vec<String>,

    /// Stage watch policy name
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Stages required by the `subsetSuccess` policy
    #[serde(default)]
    pub required_successful_stages: Vec<String>,

    /// Only watch the artifact's own resource
    #[serde(default)]
    pub watch_resource_of_interest: bool,
}

fn default_policy() -> String {
    "overallSuccess".to_string()
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            stages_to_watch: vec![],
            policy: default_policy(),
            required_successful_stages: vec![],
            watch_resource_of_interest: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for log files; stderr only when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
