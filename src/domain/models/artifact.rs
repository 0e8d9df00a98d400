//! Artifact descriptors.
//!
//! One [`Artifact`] type covers every uploadable kind; the kind decides the
//! upload subcommand and which location flag it needs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DescriptorError;
use crate::domain::models::watch_policy::StageWatchPolicy;
use crate::domain::ports::{ArtifactDescriptor, CliCommand, WatchTarget};

/// Stage selector matching every promoted stage.
pub const WATCH_ALL_STAGES: &str = "*";

/// Closed set of artifact kinds the deployment platform accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Ui,
    Java,
    Mta,
    Docker,
    Orbit,
    Helm,
}

impl ArtifactKind {
    /// Subcommand of `artifact upload`.
    pub const fn subcommand(self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Java => "java",
            Self::Mta => "mta",
            Self::Docker => "docker",
            Self::Orbit => "orbit",
            Self::Helm => "helm",
        }
    }

    /// Flag carrying the artifact location, for kinds that need one.
    pub const fn url_flag(self) -> Option<&'static str> {
        match self {
            Self::Java => Some("jar-url"),
            Self::Mta => Some("mta-url"),
            Self::Docker => Some("docker-image"),
            Self::Orbit => Some("container-image"),
            Self::Ui | Self::Helm => None,
        }
    }

    /// Whether the upload accepts `--additional-download-urls`.
    pub const fn supports_additional_download_urls(self) -> bool {
        matches!(self, Self::Java | Self::Mta | Self::Docker | Self::Orbit)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

impl FromStr for ArtifactKind {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ui" => Ok(Self::Ui),
            "java" => Ok(Self::Java),
            "mta" => Ok(Self::Mta),
            "docker" => Ok(Self::Docker),
            "orbit" => Ok(Self::Orbit),
            "helm" => Ok(Self::Helm),
            _ => Err(DescriptorError::UnknownArtifactKind(s.to_string())),
        }
    }
}

/// A fully resolved artifact descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub resource_name: String,
    pub app_names: Vec<String>,
    /// Jar/MTA url or container image, depending on `kind`
    pub artifact_url: Option<String>,
    /// Uploaded file (bundle) name
    pub files: Option<String>,
    pub upload_metadata: BTreeMap<String, String>,
    pub additional_download_urls: BTreeMap<String, String>,
    pub stages_to_watch: Vec<String>,
    pub watch_roi_only: bool,
    pub policy: StageWatchPolicy,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, resource_name: impl Into<String>) -> Self {
        Self {
            kind,
            resource_name: resource_name.into(),
            app_names: Vec::new(),
            artifact_url: None,
            files: None,
            upload_metadata: BTreeMap::new(),
            additional_download_urls: BTreeMap::new(),
            stages_to_watch: Vec::new(),
            watch_roi_only: false,
            policy: StageWatchPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_artifact_url(mut self, url: impl Into<String>) -> Self {
        self.artifact_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_stages_to_watch<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages_to_watch = stages.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: StageWatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn with_watch_roi_only(mut self, watch_roi_only: bool) -> Self {
        self.watch_roi_only = watch_roi_only;
        self
    }

    /// Check the descriptor is complete enough to upload.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.resource_name.trim().is_empty() {
            return Err(DescriptorError::EmptyResourceName);
        }
        if self.kind.url_flag().is_some()
            && self.artifact_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(DescriptorError::MissingArtifactUrl {
                kind: self.kind.to_string(),
            });
        }
        Ok(())
    }
}

impl WatchTarget for Artifact {
    fn watch_roi_only(&self) -> bool {
        self.watch_roi_only
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn stage_watch_policy(&self) -> &StageWatchPolicy {
        &self.policy
    }
}

impl ArtifactDescriptor for Artifact {
    fn stages_to_watch(&self) -> &[String] {
        &self.stages_to_watch
    }

    fn build_upload_command(&self) -> Result<CliCommand, DescriptorError> {
        self.validate()?;

        let mut command = CliCommand::new(["artifact", "upload", self.kind.subcommand()])
            .arg("--wait-for-promotion")
            .flag("resource", &self.resource_name);

        if let (Some(flag), Some(url)) = (self.kind.url_flag(), &self.artifact_url) {
            command = command.flag(flag, url);
        }
        for app in &self.app_names {
            command = command.flag("appname", app);
        }
        if let Some(files) = &self.files {
            command = command.flag("files", files);
        }
        for (key, value) in &self.upload_metadata {
            command = command.flag("metadata", format!("{key}={value}"));
        }
        if self.kind.supports_additional_download_urls() {
            for (key, url) in &self.additional_download_urls {
                command = command.flag("additional-download-urls", format!("{key}={url}"));
            }
        }

        Ok(command.flag("output", "json"))
    }
}
