//! Domain errors for the stage release system.

use thiserror::Error;

/// Failures of a single external CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("execution failed with exit code {exit_code}. captured stderr: {stderr}")]
    Failed {
        exit_code: i32,
        stderr: String,
        stdout: String,
    },

    #[error("failed to decode stdout: {source}. captured stderr: {stderr}, captured stdout: {stdout}")]
    Decode {
        #[source]
        source: serde_json::Error,
        stdout: String,
        stderr: String,
    },
}

impl CliError {
    /// Stdout captured before the command failed, if any.
    pub fn captured_stdout(&self) -> Option<&str> {
        match self {
            Self::Failed { stdout, .. } | Self::Decode { stdout, .. } if !stdout.is_empty() => {
                Some(stdout.as_str())
            }
            _ => None,
        }
    }
}

/// Root cause of a stage watch failure.
#[derive(Debug, Error)]
pub enum WatchCause {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

/// Failure while watching one stage. Captured per stage, never unwinds the
/// orchestrator.
#[derive(Debug, Error)]
pub enum StageWatchError {
    /// The live deployment watch itself failed
    #[error("failed watching stage {stage}: {source}")]
    Watch {
        stage: String,
        #[source]
        source: WatchCause,
    },

    /// Landscape resolution or usage lock acquisition failed
    #[error("failed to start watching stage {stage}: {source}")]
    PreWatch {
        stage: String,
        #[source]
        source: WatchCause,
    },

    /// Releasing the usage lock failed after the watch finished
    #[error("failed to perform cleanup tasks after watching stage {stage}: {source}")]
    PostWatch {
        stage: String,
        #[source]
        source: WatchCause,
    },
}

impl StageWatchError {
    pub fn watch(stage: impl Into<String>, source: impl Into<WatchCause>) -> Self {
        Self::Watch {
            stage: stage.into(),
            source: source.into(),
        }
    }

    pub fn pre_watch(stage: impl Into<String>, source: impl Into<WatchCause>) -> Self {
        Self::PreWatch {
            stage: stage.into(),
            source: source.into(),
        }
    }

    pub fn post_watch(stage: impl Into<String>, source: impl Into<WatchCause>) -> Self {
        Self::PostWatch {
            stage: stage.into(),
            source: source.into(),
        }
    }

    /// Stage the failure belongs to.
    pub fn stage(&self) -> &str {
        match self {
            Self::Watch { stage, .. } | Self::PreWatch { stage, .. } | Self::PostWatch { stage, .. } => {
                stage
            }
        }
    }
}

/// Failure of a whole watch cycle.
#[derive(Debug, Error)]
pub enum WatchRunError {
    /// The configured stage watch policy rejected the aggregate result
    #[error("stage release failed after watching deployments: {reason}")]
    PolicyViolation { reason: String },

    /// The final report could not be written to the output sink
    #[error("failed to write stage watch results: {0}")]
    ReportWrite(#[source] std::io::Error),
}

/// Invalid artifact descriptor configuration.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("resource name must not be empty")]
    EmptyResourceName,

    #[error("artifact kind {kind} requires an artifact url")]
    MissingArtifactUrl { kind: String },

    #[error("unknown artifact kind {0}. Must be one of: ui, java, mta, docker, orbit, helm")]
    UnknownArtifactKind(String),

    #[error("unknown stage watch policy {0}")]
    UnknownPolicy(String),

    #[error("stage watch policy subsetSuccess was specified but required successful stages are empty")]
    EmptySubset,
}

/// Failure of the end-to-end artifact upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to create upload command: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("failed to execute upload command: {0}")]
    UploadCommand(#[source] CliError),

    #[error(transparent)]
    Watch(#[from] WatchRunError),
}
