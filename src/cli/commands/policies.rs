//! `policies` command: list the available stage watch policies.

use serde::Serialize;

use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::watch_policy::{
    AVAILABLE_POLICIES, POLICY_ALWAYS_PASS, POLICY_AT_LEAST_ONE_SUCCESSFUL_DEPLOYMENT,
    POLICY_OVERALL_SUCCESS, POLICY_SUBSET_SUCCESS,
};

#[derive(Debug, Serialize)]
pub struct PolicyInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub default: bool,
}

#[derive(Debug, Serialize)]
pub struct PoliciesOutput {
    pub policies: Vec<PolicyInfo>,
}

fn describe(name: &str) -> &'static str {
    match name {
        POLICY_OVERALL_SUCCESS => "every watched stage must succeed",
        POLICY_SUBSET_SUCCESS => "the stages in required_successful_stages must succeed",
        POLICY_AT_LEAST_ONE_SUCCESSFUL_DEPLOYMENT => "at least one watched stage must succeed",
        POLICY_ALWAYS_PASS => "never fails, the watch is informational",
        _ => "",
    }
}

impl PoliciesOutput {
    pub fn available() -> Self {
        Self {
            policies: AVAILABLE_POLICIES
                .iter()
                .map(|name| PolicyInfo {
                    name,
                    description: describe(name),
                    default: *name == POLICY_OVERALL_SUCCESS,
                })
                .collect(),
        }
    }
}

impl CommandOutput for PoliciesOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["policy", "description"]);
        for policy in &self.policies {
            let name = if policy.default {
                format!("{} (default)", policy.name)
            } else {
                policy.name.to_string()
            };
            table.add_row(vec![name, policy.description.to_string()]);
        }
        table.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(json_mode: bool) {
    output(&PoliciesOutput::available(), json_mode);
}
