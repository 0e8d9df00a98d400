//! Promotion results returned by the artifact upload command.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage name prefix used by orbit deployments.
pub const ORBIT_STAGE_PREFIX: &str = "orbit/";

/// Outcome of promoting an uploaded artifact to one stage.
///
/// Parsed case-insensitively. Anything the deployment platform reports
/// beyond the three known states is preserved verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromotionStatus {
    /// A vector deployment was triggered and is in flight
    Created,
    /// Nothing changed, no deployment was triggered
    Success,
    /// Promotion failed before a deployment could be triggered
    Error,
    /// Unrecognized status string
    Unknown(String),
}

impl PromotionStatus {
    /// Canonical lowercase representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Success => "success",
            Self::Error => "error",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for PromotionStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "created" => Self::Created,
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<PromotionStatus> for String {
    fn from(status: PromotionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage's promotion outcome as returned by the upload command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionResultEntry {
    /// Stage (promotion target) name, e.g. `Dev/AllStableFeatures`
    #[serde(rename = "branch", alias = "stage")]
    pub stage: String,

    /// Promotion status
    pub status: PromotionStatus,

    /// Vector created for this stage
    #[serde(rename = "vectorId", default)]
    pub vector_id: String,

    /// Promotion error, set when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PromotionResultEntry {
    /// Create an entry without a promotion error.
    pub fn new(
        stage: impl Into<String>,
        status: PromotionStatus,
        vector_id: impl Into<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            status,
            vector_id: vector_id.into(),
            error: None,
        }
    }

    /// Attach a promotion error message.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Whether this stage is served by an orbit deployment.
    pub fn is_orbit_stage(&self) -> bool {
        self.stage.starts_with(ORBIT_STAGE_PREFIX)
    }
}

/// Response of the `artifact upload` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactUploadResponse {
    /// Application name the artifact was uploaded for
    #[serde(rename = "appname", default)]
    pub app_name: String,

    /// Vector created by the upload
    #[serde(rename = "createdVector", default)]
    pub created_vector: String,

    /// Upload id
    #[serde(default)]
    pub id: String,

    /// Per-stage promotion results, in platform order
    #[serde(rename = "promotionResult", default)]
    pub promotion_result: Vec<PromotionResultEntry>,

    /// Upload type
    #[serde(rename = "type", default)]
    pub upload_type: String,
}

/// Response of the `deployment vector wait-for` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForDeploymentResponse {
    /// Landscape the vector is deployed into; empty when no deployment started
    #[serde(default)]
    pub landscape: String,
}
