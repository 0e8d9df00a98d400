//! `release` command: upload the configured artifact and watch its stages.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{colorize_status, list_table, output, CommandOutput};
use crate::cli::report_sink;
use crate::cli::types::ReleaseArgs;
use crate::domain::models::config::Config;
use crate::domain::models::promotion::ArtifactUploadResponse;
use crate::domain::ports::CommandExecutor;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::dwc::ProcessCommandExecutor;
use crate::services::{DefaultStageWatchOrchestrator, UploadController};

#[derive(Debug, Serialize)]
pub struct PromotionOutput {
    pub stage: String,
    pub status: String,
    pub vector_id: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadOutput {
    pub app_name: String,
    pub created_vector: String,
    pub upload_id: String,
    pub upload_type: String,
    pub promotions: Vec<PromotionOutput>,
}

impl From<&ArtifactUploadResponse> for UploadOutput {
    fn from(response: &ArtifactUploadResponse) -> Self {
        Self {
            app_name: response.app_name.clone(),
            created_vector: response.created_vector.clone(),
            upload_id: response.id.clone(),
            upload_type: response.upload_type.clone(),
            promotions: response
                .promotion_result
                .iter()
                .map(|r| PromotionOutput {
                    stage: r.stage.clone(),
                    status: r.status.to_string(),
                    vector_id: r.vector_id.clone(),
                    error: r.error.clone(),
                })
                .collect(),
        }
    }
}

impl CommandOutput for UploadOutput {
    fn to_human(&self) -> String {
        let headline = format!(
            "Uploaded {} artifact for {} as vector {}",
            self.upload_type, self.app_name, self.created_vector
        );
        if self.promotions.is_empty() {
            return format!("{headline}\nNo promotions were triggered.");
        }

        let mut table = list_table(&["stage", "status", "vector", "error"]);
        for promotion in &self.promotions {
            table.add_row(vec![
                promotion.stage.clone(),
                colorize_status(&promotion.status).to_string(),
                promotion.vector_id.clone(),
                promotion.error.clone().unwrap_or_default(),
            ]);
        }
        format!("{headline}\n{table}")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Apply command line overrides to the loaded configuration.
pub fn apply_overrides(config: &Config, args: ReleaseArgs) -> Config {
    let mut config = config.clone();
    if !args.stages.is_empty() {
        config.watch.stages_to_watch = args.stages;
    }
    if let Some(policy) = args.policy {
        config.watch.policy = policy;
    }
    config
}

pub async fn execute(args: ReleaseArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config = apply_overrides(config, args);
    let artifact = ConfigLoader::artifact(&config).context("Invalid artifact configuration")?;

    let executor: Arc<dyn CommandExecutor> =
        Arc::new(ProcessCommandExecutor::new(&config.cli.binary_path));
    let orchestrator = Arc::new(DefaultStageWatchOrchestrator::new(
        config.cli.usage_name.as_str(),
        config.cli.binary_path.as_str(),
    ));
    let controller = UploadController::with_sink(executor, orchestrator, report_sink(json_mode));

    let response = controller
        .upload_artifact(&artifact)
        .await
        .context("Stage release failed")?;

    output(&UploadOutput::from(&response), json_mode);
    Ok(())
}
