//! Temporary usage placed on a vector while its deployment is watched.

use chrono::Utc;

use crate::domain::errors::CliError;
use crate::domain::ports::CommandExecutor;
use crate::infrastructure::dwc::commands;

/// An acquired usage lease.
///
/// Release reuses the exact expiry the lease was acquired with, so the
/// platform can match both calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageLease {
    pub landscape: String,
    pub vector_id: String,
    pub expiry: String,
    pub usage: String,
}

impl UsageLease {
    /// Place the usage, expiring one lock window from now.
    pub async fn acquire(
        executor: &dyn CommandExecutor,
        landscape: &str,
        vector_id: &str,
        usage: &str,
    ) -> Result<Self, CliError> {
        let lease = Self {
            landscape: landscape.to_string(),
            vector_id: vector_id.to_string(),
            expiry: commands::usage_expiry(Utc::now()),
            usage: usage.to_string(),
        };
        let command =
            commands::add_vector_usage(&lease.landscape, &lease.vector_id, &lease.expiry, &lease.usage);
        executor.execute(&command).await?;
        tracing::debug!(
            landscape = %lease.landscape,
            vector = %lease.vector_id,
            expires_at = %lease.expiry,
            "Placed temporary vector usage"
        );
        Ok(lease)
    }

    /// Remove the usage again.
    pub async fn release(&self, executor: &dyn CommandExecutor) -> Result<(), CliError> {
        let command =
            commands::remove_vector_usage(&self.landscape, &self.vector_id, &self.expiry, &self.usage);
        executor.execute(&command).await?;
        tracing::debug!(landscape = %self.landscape, vector = %self.vector_id, "Removed temporary vector usage");
        Ok(())
    }

    /// Explanation for a failed release, including how to clean up by hand.
    pub fn release_failure_message(&self, stage: &str, binary: &str, error: &CliError) -> String {
        format!(
            "failed to remove usage {} from stage {stage} in landscape {} targeting vector {}. Either delete the usage manually by running {binary} {} -h or wait until {} for the usage to expire. Error was {error}",
            self.usage,
            self.landscape,
            self.vector_id,
            commands::remove_usage_command_hint(),
            self.expiry,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stage_watch::test_support::MockExecutor;

    #[tokio::test]
    async fn test_acquire_and_release_use_the_same_expiry() {
        let executor = MockExecutor::new(|_| Ok(String::new()));

        let lease = UsageLease::acquire(&executor, "eu10", "v1", "stageRelease")
            .await
            .unwrap();
        lease.release(&executor).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args()[2], "add-usage");
        assert_eq!(calls[1].args()[2], "remove-usage");
        assert_eq!(calls[0].args()[3..], calls[1].args()[3..]);
        assert_eq!(calls[0].flag_value("expiresAt"), Some(lease.expiry.as_str()));
        assert_eq!(calls[0].flag_value("usage"), Some("stageRelease"));
    }

    #[tokio::test]
    async fn test_failed_acquire_is_returned() {
        let executor = MockExecutor::new(|_| {
            Err(CliError::Failed {
                exit_code: 1,
                stderr: "forbidden".into(),
                stdout: String::new(),
            })
        });

        let result = UsageLease::acquire(&executor, "eu10", "v1", "stageRelease").await;

        assert!(matches!(result, Err(CliError::Failed { exit_code: 1, .. })));
    }

    #[test]
    fn test_release_failure_message_names_manual_cleanup() {
        let lease = UsageLease {
            landscape: "eu10".into(),
            vector_id: "v1".into(),
            expiry: "2026-01-01T01:00:00Z".into(),
            usage: "stageRelease".into(),
        };
        let error = CliError::Failed {
            exit_code: 1,
            stderr: "gone".into(),
            stdout: String::new(),
        };

        let message = lease.release_failure_message("Dev/A", "dwc", &error);

        assert!(message.starts_with("failed to remove usage stageRelease from stage Dev/A in landscape eu10 targeting vector v1."));
        assert!(message.contains("dwc deployment vector remove-usage -h"));
        assert!(message.contains("wait until 2026-01-01T01:00:00Z"));
        assert!(message.contains("gone"));
    }
}
