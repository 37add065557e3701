//! Action executor - walks a locator set against a live driver
//!
//! Steps for one action:
//! 1. Resolve the effective text mode
//! 2. Walk primary then fallbacks, each lookup under a bounded wait
//! 3. Click, fill or compare text on the first element found
//! 4. On a text mismatch, retry once in the other mode on the same element
//! 5. Classify the walk into an [`ExecutionOutcome`] and build the report

use crate::{
    driver::{ElementDriver, ElementHandle},
    errors::DriverError,
    outcome::{ActionReport, AttemptStatus, CandidateAttempt, ExecutionOutcome},
    text_mode::effective_text_mode,
    types::{ActionKind, ExecConfig, TextMode, UiAction},
};
use action_locator::SelectorCandidate;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Executes one [`UiAction`] at a time over an [`ElementDriver`]
#[derive(Clone)]
pub struct ActionExecutor {
    driver: Arc<dyn ElementDriver>,
    config: ExecConfig,
}

impl ActionExecutor {
    pub fn new(driver: Arc<dyn ElementDriver>, config: ExecConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    pub fn driver(&self) -> &Arc<dyn ElementDriver> {
        &self.driver
    }

    /// Execute an action and report the outcome.
    ///
    /// Never fails: driver errors are folded into the attempt log and the
    /// walk moves on to the next candidate.
    pub async fn execute(&self, action: &UiAction) -> ActionReport {
        let action_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start_instant = Instant::now();
        let mode = effective_text_mode(action);
        let budget = self.config.candidate_budget(action.locators.len());

        info!(
            action_id = %action_id,
            kind = %action.action_type(),
            primary = %action.locators.primary.selector,
            candidates = budget,
            mode = %mode,
            "Executing action"
        );

        let mut attempts = Vec::with_capacity(budget);
        for candidate in action.locators.candidates().take(budget) {
            let attempt = self.attempt(&action_id, action, candidate, mode).await;
            let succeeded = attempt.is_success();
            attempts.push(attempt);
            if succeeded {
                break;
            }
        }

        let latency_ms = start_instant.elapsed().as_millis() as u64;
        let outcome = classify(&attempts);

        let report = if outcome.is_success() {
            info!(
                action_id = %action_id,
                latency_ms = latency_ms,
                attempts = attempts.len(),
                "Action completed successfully"
            );
            ActionReport::success(
                action_id,
                action.action_type(),
                started_at,
                latency_ms,
                attempts,
            )
        } else {
            let report = ActionReport::failure(
                action_id,
                action.action_type(),
                started_at,
                latency_ms,
                outcome,
                attempts,
            );
            warn!(
                action_id = %report.action_id,
                outcome = %outcome,
                diagnostic = report.diagnostic.as_deref().unwrap_or_default(),
                "Action failed"
            );
            report
        };

        report
            .with_description(action.describe())
            .with_text_mode(mode)
    }

    async fn attempt(
        &self,
        action_id: &str,
        action: &UiAction,
        candidate: &SelectorCandidate,
        mode: TextMode,
    ) -> CandidateAttempt {
        let started = Instant::now();
        let mut attempt = CandidateAttempt::new(&candidate.selector, candidate.tier);

        debug!(
            action_id = %action_id,
            selector = %candidate.selector,
            tier = %candidate.tier,
            "Trying candidate"
        );

        match self.lookup(&candidate.selector).await {
            Ok(Some(handle)) => {
                self.act(action, &handle, mode, &mut attempt).await;
            }
            Ok(None) | Err(DriverError::LookupTimeout { .. }) => {
                debug!(action_id = %action_id, selector = %candidate.selector, "Candidate not found");
                attempt.status = AttemptStatus::NotFound;
            }
            Err(err) => {
                warn!(
                    action_id = %action_id,
                    selector = %candidate.selector,
                    error = %err,
                    "Lookup failed"
                );
                attempt.status = AttemptStatus::LookupFailed;
                attempt.error = Some(err.to_string());
            }
        }

        attempt.elapsed_ms = started.elapsed().as_millis() as u64;
        attempt
    }

    /// Bounded lookup. The driver receives the timeout and the executor
    /// enforces it as well.
    async fn lookup(&self, selector: &str) -> Result<Option<ElementHandle>, DriverError> {
        let wait = self.config.element_wait();
        match tokio::time::timeout(wait, self.driver.find_element(selector, wait)).await {
            Ok(result) => result,
            Err(_) => Err(DriverError::LookupTimeout {
                selector: selector.to_string(),
                timeout_ms: self.config.element_wait_ms,
            }),
        }
    }

    async fn act(
        &self,
        action: &UiAction,
        handle: &ElementHandle,
        mode: TextMode,
        attempt: &mut CandidateAttempt,
    ) {
        let result = match &action.kind {
            ActionKind::Click => self.driver.click(handle).await,
            ActionKind::Input { value } => self.driver.fill(handle, value).await,
            ActionKind::VerifyText { expected } => {
                return self.verify(handle, expected, mode, attempt).await;
            }
        };

        match result {
            Ok(()) => attempt.status = AttemptStatus::Succeeded,
            Err(err) => {
                warn!(selector = %attempt.selector, error = %err, "Interaction failed");
                attempt.status = AttemptStatus::InteractionFailed;
                attempt.error = Some(err.to_string());
            }
        }
    }

    async fn verify(
        &self,
        handle: &ElementHandle,
        expected: &str,
        mode: TextMode,
        attempt: &mut CandidateAttempt,
    ) {
        let modes = [mode, mode.other()];
        let tries = if self.config.cross_mode_retry { 2 } else { 1 };

        for &current in &modes[..tries] {
            let actual = match self.driver.read_text(handle, current).await {
                Ok(text) => text,
                Err(err) => {
                    warn!(selector = %attempt.selector, mode = %current, error = %err, "Text read failed");
                    attempt.status = AttemptStatus::InteractionFailed;
                    attempt.error = Some(err.to_string());
                    return;
                }
            };

            let matched = actual.trim() == expected.trim();
            debug!(
                selector = %attempt.selector,
                mode = %current,
                actual = %actual.trim(),
                matched = matched,
                "Compared text"
            );
            attempt.observe(current, actual);

            if matched {
                attempt.status = AttemptStatus::Succeeded;
                return;
            }
        }

        attempt.status = AttemptStatus::TextMismatch;
    }
}

/// Fold the attempt log into one outcome
fn classify(attempts: &[CandidateAttempt]) -> ExecutionOutcome {
    if attempts.iter().any(CandidateAttempt::is_success) {
        ExecutionOutcome::Success
    } else if !attempts.is_empty()
        && attempts
            .iter()
            .all(|a| a.status == AttemptStatus::TextMismatch)
    {
        ExecutionOutcome::AssertionMismatch
    } else {
        ExecutionOutcome::FailedAllCandidates
    }
}
