//! Stage watch policies.
//!
//! A policy aggregates per-stage watch outcomes into a single verdict. It
//! only ever consults [`WatchResult::succeeded`] and
//! [`WatchResult::stage_name`], so a stage in the unknown (orbit) state
//! counts as successful unless its watch explicitly failed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::errors::{DescriptorError, WatchRunError};

/// Read-only view of one stage's terminal watch state.
pub trait WatchResult {
    fn succeeded(&self) -> bool;
    fn stage_name(&self) -> &str;
}

impl<T: WatchResult + ?Sized> WatchResult for Arc<T> {
    fn succeeded(&self) -> bool {
        (**self).succeeded()
    }

    fn stage_name(&self) -> &str {
        (**self).stage_name()
    }
}

impl<T: WatchResult + ?Sized> WatchResult for &T {
    fn succeeded(&self) -> bool {
        (**self).succeeded()
    }

    fn stage_name(&self) -> &str {
        (**self).stage_name()
    }
}

pub const POLICY_OVERALL_SUCCESS: &str = "overallSuccess";
pub const POLICY_SUBSET_SUCCESS: &str = "subsetSuccess";
pub const POLICY_AT_LEAST_ONE_SUCCESSFUL_DEPLOYMENT: &str = "atLeastOneSuccessfulDeployment";
pub const POLICY_ALWAYS_PASS: &str = "alwaysPass";

/// All policy names accepted in configuration.
pub const AVAILABLE_POLICIES: [&str; 4] = [
    POLICY_OVERALL_SUCCESS,
    POLICY_SUBSET_SUCCESS,
    POLICY_AT_LEAST_ONE_SUCCESSFUL_DEPLOYMENT,
    POLICY_ALWAYS_PASS,
];

/// Aggregation rule deciding overall pass/fail from per-stage outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StageWatchPolicy {
    /// Every watched stage must succeed
    #[default]
    OverallSuccess,
    /// At least one watched stage must succeed
    AtLeastOneSuccessfulDeployment,
    /// The listed stages must succeed, all others may fail
    SubsetSuccess(Vec<String>),
    /// Purely observational, never fails
    AlwaysPass,
}

impl StageWatchPolicy {
    /// Resolve a configured policy name.
    ///
    /// `required_stages` is only consulted for `subsetSuccess`, which rejects
    /// an empty list.
    pub fn resolve(name: &str, required_stages: &[String]) -> Result<Self, DescriptorError> {
        match name {
            POLICY_SUBSET_SUCCESS => {
                if required_stages.is_empty() {
                    return Err(DescriptorError::EmptySubset);
                }
                Ok(Self::SubsetSuccess(required_stages.to_vec()))
            }
            other => other.parse(),
        }
    }

    /// Configuration name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OverallSuccess => POLICY_OVERALL_SUCCESS,
            Self::AtLeastOneSuccessfulDeployment => POLICY_AT_LEAST_ONE_SUCCESSFUL_DEPLOYMENT,
            Self::SubsetSuccess(_) => POLICY_SUBSET_SUCCESS,
            Self::AlwaysPass => POLICY_ALWAYS_PASS,
        }
    }

    /// Evaluate the policy against the watched stages.
    pub fn evaluate<R: WatchResult>(&self, results: &[R]) -> Result<(), WatchRunError> {
        match self {
            Self::OverallSuccess => {
                let failures: Vec<&str> = results
                    .iter()
                    .filter(|r| !r.succeeded())
                    .map(WatchResult::stage_name)
                    .collect();
                if failures.is_empty() {
                    return Ok(());
                }
                Err(WatchRunError::PolicyViolation {
                    reason: format!(
                        "the deployment to the following stages failed: {}. But all must be successful. Have a look at the deployment logs or consider changing the stage watch policy",
                        format_stage_list(&failures)
                    ),
                })
            }
            Self::AtLeastOneSuccessfulDeployment => {
                if results.iter().any(WatchResult::succeeded) {
                    return Ok(());
                }
                Err(WatchRunError::PolicyViolation {
                    reason: "the deployment to all stages failed. But at least one must be successful. Have a look at the deployment logs or consider changing the stage watch policy".to_string(),
                })
            }
            Self::SubsetSuccess(required) => {
                let violations: Vec<&str> = results
                    .iter()
                    .filter(|r| !r.succeeded())
                    .map(WatchResult::stage_name)
                    .filter(|stage| required.iter().any(|req| req == stage))
                    .collect();
                if violations.is_empty() {
                    return Ok(());
                }
                let required: Vec<&str> = required.iter().map(String::as_str).collect();
                Err(WatchRunError::PolicyViolation {
                    reason: format!(
                        "the deployment to the following stages must be successful {}, but a subset of those failed: {}. Have a look at the deployment logs or consider changing the stage watch policy",
                        format_stage_list(&required),
                        format_stage_list(&violations)
                    ),
                })
            }
            Self::AlwaysPass => Ok(()),
        }
    }
}

fn format_stage_list(stages: &[&str]) -> String {
    format!("[{}]", stages.join(", "))
}

impl FromStr for StageWatchPolicy {
    type Err = DescriptorError;

    /// Parses the policies that need no arguments. `subsetSuccess` has to go
    /// through [`StageWatchPolicy::resolve`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            POLICY_OVERALL_SUCCESS => Ok(Self::OverallSuccess),
            POLICY_AT_LEAST_ONE_SUCCESSFUL_DEPLOYMENT => Ok(Self::AtLeastOneSuccessfulDeployment),
            POLICY_ALWAYS_PASS => Ok(Self::AlwaysPass),
            POLICY_SUBSET_SUCCESS => Err(DescriptorError::EmptySubset),
            other => Err(DescriptorError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for StageWatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubsetSuccess(stages) => {
                let stages: Vec<&str> = stages.iter().map(String::as_str).collect();
                write!(f, "{} {}", self.name(), format_stage_list(&stages))
            }
            _ => f.write_str(self.name()),
        }
    }
}
