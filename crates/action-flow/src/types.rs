//! Core types for scenario execution

use action_primitives::{ActionReport, ExecutionOutcome};
use chrono::{DateTime, Utc};
use replay_recipes::Cluster;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure strategy - how to handle a step that did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailureStrategy {
    /// Stop the scenario at the first failed step
    #[default]
    Abort,

    /// Record the failure and run the next step
    Continue,
}

impl fmt::Display for FailureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStrategy::Abort => f.write_str("abort"),
            FailureStrategy::Continue => f.write_str("continue"),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlowConfig {
    pub on_failure: FailureStrategy,
}

/// Step execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    /// Zero-based step index
    pub index: usize,

    pub description: String,

    pub success: bool,

    pub report: ActionReport,
}

impl StepResult {
    pub fn new(index: usize, report: ActionReport) -> Self {
        Self {
            index,
            description: report.description.clone(),
            success: report.is_success(),
            report,
        }
    }

    pub fn outcome(&self) -> ExecutionOutcome {
        self.report.outcome
    }

    /// One line for the human-readable step log
    pub fn log_line(&self) -> String {
        format!("{}. {} -> {}", self.index + 1, self.description, self.report.outcome)
    }
}

/// Scenario execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub scenario: String,

    /// Every step ran and succeeded
    pub success: bool,

    /// Cancellation was observed between steps
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Total latency in milliseconds
    pub latency_ms: u64,

    pub steps: Vec<StepResult>,

    /// Human-readable description of each executed step
    pub step_log: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,

    /// Repeated step runs found in the scenario
    pub clusters: Vec<Cluster>,
}

impl ScenarioReport {
    /// Create a new scenario report
    pub fn new(scenario: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            scenario: scenario.into(),
            success: false,
            cancelled: false,
            started_at: now,
            finished_at: now,
            latency_ms: 0,
            steps: Vec::new(),
            step_log: Vec::new(),
            abort_reason: None,
            clusters: Vec::new(),
        }
    }

    pub fn with_clusters(mut self, clusters: Vec<Cluster>) -> Self {
        self.clusters = clusters;
        self
    }

    /// Add step result and its log line
    pub fn push_step(&mut self, step: StepResult) {
        self.step_log.push(step.log_line());
        self.steps.push(step);
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.abort_reason = Some(reason.into());
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps.iter().filter(|s| !s.success)
    }

    /// Set finish time, success flag and latency
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self.success = self.abort_reason.is_none()
            && !self.cancelled
            && self.steps.iter().all(|s| s.success);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_strategy_parses_lowercase() {
        let config: FlowConfig = serde_yaml::from_str("on_failure: continue").unwrap();
        assert_eq!(config.on_failure, FailureStrategy::Continue);
        assert_eq!(FlowConfig::default().on_failure, FailureStrategy::Abort);
    }

    #[test]
    fn empty_report_finishes_successfully() {
        let report = ScenarioReport::new("empty").finish();
        assert!(report.success);
        assert!(report.steps.is_empty());
    }

    #[test]
    fn abort_reason_fails_report() {
        let mut report = ScenarioReport::new("aborted");
        report.abort("step 1 failed");
        assert!(!report.finish().success);
    }
}
