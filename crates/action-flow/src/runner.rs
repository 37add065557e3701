//! Scenario runner implementation

use crate::errors::FlowError;
use crate::scenario::Scenario;
use crate::types::{FailureStrategy, FlowConfig, ScenarioReport, StepResult};
use action_primitives::ActionExecutor;
use async_trait::async_trait;
use replay_recipes::{ClusterDetector, RecPolicyView};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Scenario runner trait
#[async_trait]
pub trait ScenarioRunner: Send + Sync {
    /// Run every action of a scenario in order
    async fn run(&self, scenario: &Scenario, cancel: &CancellationToken) -> ScenarioReport;
}

/// Default scenario runner implementation
///
/// Actions run strictly in order. Cancellation is checked between actions,
/// so an action always finishes before the runner stops.
pub struct DefaultScenarioRunner {
    executor: ActionExecutor,
    config: FlowConfig,
    detector: ClusterDetector,
}

impl DefaultScenarioRunner {
    /// Create a new scenario runner
    pub fn new(executor: ActionExecutor, config: FlowConfig) -> Self {
        Self {
            executor,
            config,
            detector: ClusterDetector::default(),
        }
    }

    /// Detect repeated runs with the given recipe policy
    pub fn with_policy(mut self, policy: &RecPolicyView) -> Result<Self, FlowError> {
        self.detector = ClusterDetector::new(policy)?;
        Ok(self)
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }
}

#[async_trait]
impl ScenarioRunner for DefaultScenarioRunner {
    async fn run(&self, scenario: &Scenario, cancel: &CancellationToken) -> ScenarioReport {
        let clusters = scenario.clusters(&self.detector);
        let mut report = ScenarioReport::new(&scenario.name).with_clusters(clusters);

        info!(
            scenario = %scenario.name,
            steps = scenario.len(),
            on_failure = %self.config.on_failure,
            clusters = report.clusters.len(),
            "Running scenario"
        );

        for (index, action) in scenario.actions.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(scenario = %scenario.name, step = index + 1, "Scenario cancelled");
                report.cancelled = true;
                report.abort(format!("cancelled before step {}", index + 1));
                break;
            }

            let step = StepResult::new(index, self.executor.execute(action).await);
            let failed = !step.success;
            let reason = step
                .report
                .diagnostic
                .clone()
                .unwrap_or_else(|| step.outcome().to_string());
            let description = step.description.clone();
            report.push_step(step);

            if failed {
                warn!(
                    scenario = %scenario.name,
                    step = index + 1,
                    reason = %reason,
                    "Step failed"
                );
                if self.config.on_failure == FailureStrategy::Abort {
                    report.abort(format!(
                        "step {} ({}) failed: {}",
                        index + 1,
                        description,
                        reason
                    ));
                    break;
                }
            }
        }

        let report = report.finish();
        info!(
            scenario = %scenario.name,
            success = report.success,
            executed = report.steps.len(),
            latency_ms = report.latency_ms,
            "Scenario finished"
        );
        report
    }
}
