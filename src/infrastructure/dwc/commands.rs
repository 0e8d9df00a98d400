//! Builders for `deployment vector` commands issued while watching stages.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::domain::ports::CliCommand;

/// Lifetime of the temporary usage placed on a watched stage, in minutes.
///
/// Also used as the watch command's timeout so the lease never expires
/// while a watch is still running.
pub const STAGE_WATCH_LOCK_MINUTES: i64 = 60;

pub const WAIT_FOR_SUBCOMMAND: &str = "wait-for";
pub const WATCH_SUBCOMMAND: &str = "watch";
pub const ADD_USAGE_SUBCOMMAND: &str = "add-usage";
pub const REMOVE_USAGE_SUBCOMMAND: &str = "remove-usage";

const LIVE_LOG_MODE: &str = "live";

fn deployment_vector(subcommand: &str) -> CliCommand {
    CliCommand::new(["deployment", "vector", subcommand])
}

/// Human readable base of the remove-usage command, for manual cleanup hints.
pub fn remove_usage_command_hint() -> String {
    format!("deployment vector {REMOVE_USAGE_SUBCOMMAND}")
}

pub fn wait_for_deployment(stage: &str, vector_id: &str) -> CliCommand {
    deployment_vector(WAIT_FOR_SUBCOMMAND)
        .flag("stage", stage)
        .flag("vector", vector_id)
        .flag("output", "json")
}

pub fn add_vector_usage(landscape: &str, vector_id: &str, expiry: &str, usage: &str) -> CliCommand {
    usage_command(ADD_USAGE_SUBCOMMAND, landscape, vector_id, expiry, usage)
}

pub fn remove_vector_usage(
    landscape: &str,
    vector_id: &str,
    expiry: &str,
    usage: &str,
) -> CliCommand {
    usage_command(REMOVE_USAGE_SUBCOMMAND, landscape, vector_id, expiry, usage)
}

fn usage_command(
    subcommand: &str,
    landscape: &str,
    vector_id: &str,
    expiry: &str,
    usage: &str,
) -> CliCommand {
    deployment_vector(subcommand)
        .flag("landscape", landscape)
        .flag("vector", vector_id)
        .flag("expiresAt", expiry)
        .flag("usage", usage)
}

pub fn watch_vector_deployment(
    landscape: &str,
    vector_id: &str,
    resource_of_interest: Option<&str>,
) -> CliCommand {
    let command = deployment_vector(WATCH_SUBCOMMAND)
        .flag("landscape", landscape)
        .flag("vector", vector_id)
        .flag("logs", LIVE_LOG_MODE)
        .flag("timeout", format!("{STAGE_WATCH_LOCK_MINUTES}m"));
    match resource_of_interest {
        Some(resource) => command.flag("resource-of-interest", resource),
        None => command,
    }
}

/// Expiry timestamp of a usage lease started at `now`, RFC 3339 in UTC.
pub fn usage_expiry(now: DateTime<Utc>) -> String {
    (now + Duration::minutes(STAGE_WATCH_LOCK_MINUTES)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wait_for_command() {
        let cmd = wait_for_deployment("Dev/A", "v1");
        assert_eq!(
            cmd.args(),
            ["deployment", "vector", "wait-for", "--stage=Dev/A", "--vector=v1", "--output=json"]
        );
    }

    #[test]
    fn test_usage_commands_share_shape() {
        let add = add_vector_usage("eu10", "v1", "2026-01-01T01:00:00Z", "stageRelease");
        let remove = remove_vector_usage("eu10", "v1", "2026-01-01T01:00:00Z", "stageRelease");
        assert_eq!(
            add.args(),
            [
                "deployment",
                "vector",
                "add-usage",
                "--landscape=eu10",
                "--vector=v1",
                "--expiresAt=2026-01-01T01:00:00Z",
                "--usage=stageRelease",
            ]
        );
        assert_eq!(add.args()[3..], remove.args()[3..]);
        assert_eq!(remove.args()[2], "remove-usage");
    }

    #[test]
    fn test_watch_command_with_and_without_roi() {
        let plain = watch_vector_deployment("eu10", "v1", None);
        assert_eq!(
            plain.args(),
            [
                "deployment",
                "vector",
                "watch",
                "--landscape=eu10",
                "--vector=v1",
                "--logs=live",
                "--timeout=60m",
            ]
        );
        let roi = watch_vector_deployment("eu10", "v1", Some("my-service"));
        assert_eq!(roi.flag_value("resource-of-interest"), Some("my-service"));
    }

    #[test]
    fn test_usage_expiry_is_one_hour_later_in_utc() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 15).unwrap();
        assert_eq!(usage_expiry(now), "2026-03-02T00:30:15Z");
    }
}
