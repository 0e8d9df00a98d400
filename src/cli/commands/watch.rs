//! `watch` command: re-watch the promotion results of an earlier upload.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::output::{output, CommandOutput};
use crate::cli::report_sink;
use crate::cli::types::WatchArgs;
use crate::domain::models::config::Config;
use crate::domain::models::promotion::{ArtifactUploadResponse, PromotionResultEntry};
use crate::domain::models::watch_policy::StageWatchPolicy;
use crate::domain::ports::{StageWatchOrchestrator, WatchTarget};
use crate::infrastructure::dwc::ProcessCommandExecutor;
use crate::services::DefaultStageWatchOrchestrator;

/// Watch target assembled from configuration, without an uploadable artifact.
#[derive(Debug, Clone)]
pub struct ConfiguredTarget {
    resource_name: String,
    watch_roi_only: bool,
    policy: StageWatchPolicy,
}

impl ConfiguredTarget {
    pub fn from_config(config: &Config, policy_override: Option<&str>) -> Result<Self> {
        let policy_name = policy_override.unwrap_or(&config.watch.policy);
        let policy =
            StageWatchPolicy::resolve(policy_name, &config.watch.required_successful_stages)
                .context("Invalid stage watch policy")?;
        Ok(Self {
            resource_name: config.artifact.resource_name.clone(),
            watch_roi_only: config.watch.watch_resource_of_interest,
            policy,
        })
    }
}

impl WatchTarget for ConfiguredTarget {
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

#[derive(Deserialize)]
#[serde(untagged)]
enum PromotionResultsFile {
    Results(Vec<PromotionResultEntry>),
    Upload(ArtifactUploadResponse),
}

/// Parse either a bare promotion result array or a complete upload response.
pub fn parse_promotion_results(raw: &str) -> Result<Vec<PromotionResultEntry>> {
    let file: PromotionResultsFile =
        serde_json::from_str(raw).context("Promotion results are neither a result list nor an upload response")?;
    Ok(match file {
        PromotionResultsFile::Results(results) => results,
        PromotionResultsFile::Upload(response) => response.promotion_result,
    })
}

#[derive(Debug, Serialize)]
pub struct WatchOutput {
    pub stages: usize,
    pub policy: String,
    pub passed: bool,
}

impl CommandOutput for WatchOutput {
    fn to_human(&self) -> String {
        format!(
            "Watched {} stage(s). Stage watch policy {} is satisfied.",
            self.stages, self.policy
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

async fn read_promotion_results(path: &Path) -> Result<Vec<PromotionResultEntry>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read promotion results from {}", path.display()))?;
    parse_promotion_results(&raw)
}

pub async fn execute(args: WatchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let results = read_promotion_results(&args.promotion_results).await?;
    let target = ConfiguredTarget::from_config(config, args.policy.as_deref())?;

    let orchestrator = DefaultStageWatchOrchestrator::new(
        config.cli.usage_name.as_str(),
        config.cli.binary_path.as_str(),
    );
    orchestrator
        .watch_vector_deployments(
            &results,
            report_sink(json_mode),
            Arc::new(ProcessCommandExecutor::new(&config.cli.binary_path)),
            &target,
        )
        .await
        .context("Stage watch failed")?;

    output(
        &WatchOutput {
            stages: results.len(),
            policy: target.policy.to_string(),
            passed: true,
        },
        json_mode,
    );
    Ok(())
}
