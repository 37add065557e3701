//! Execution outcomes and per-action reports

use action_locator::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ActionType, TextMode};

/// Final classification of one action execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionOutcome {
    Success,
    /// No candidate produced a usable element
    FailedAllCandidates,
    /// Per-candidate classification: nothing matched the selector
    ElementNotFound,
    /// Elements were found but text never matched in either mode
    AssertionMismatch,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success => "success",
            ExecutionOutcome::FailedAllCandidates => "failedAllCandidates",
            ExecutionOutcome::ElementNotFound => "elementNotFound",
            ExecutionOutcome::AssertionMismatch => "assertionMismatch",
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of trying a single candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttemptStatus {
    Succeeded,
    /// Lookup returned nothing within the bounded wait
    NotFound,
    /// Lookup itself failed in the driver
    LookupFailed,
    /// Element found but click, fill or text read failed
    InteractionFailed,
    /// Element found, text compared and did not match
    TextMismatch,
}

impl AttemptStatus {
    /// Outcome this attempt would mean on its own
    pub fn as_outcome(&self) -> ExecutionOutcome {
        match self {
            AttemptStatus::Succeeded => ExecutionOutcome::Success,
            AttemptStatus::TextMismatch => ExecutionOutcome::AssertionMismatch,
            AttemptStatus::NotFound
            | AttemptStatus::LookupFailed
            | AttemptStatus::InteractionFailed => ExecutionOutcome::ElementNotFound,
        }
    }
}

/// Text read from an element in one mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedText {
    pub mode: TextMode,
    pub text: String,
}

/// Log entry for one candidate tried during the walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAttempt {
    pub selector: String,
    pub tier: Tier,
    pub status: AttemptStatus,

    /// Text modes compared, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes_tried: Vec<TextMode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observed: Vec<ObservedText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub elapsed_ms: u64,
}

impl CandidateAttempt {
    pub fn new(selector: impl Into<String>, tier: Tier) -> Self {
        Self {
            selector: selector.into(),
            tier,
            status: AttemptStatus::NotFound,
            modes_tried: Vec::new(),
            observed: Vec::new(),
            error: None,
            elapsed_ms: 0,
        }
    }

    /// Record a text comparison in `mode`
    pub fn observe(&mut self, mode: TextMode, text: impl Into<String>) {
        self.modes_tried.push(mode);
        self.observed.push(ObservedText {
            mode,
            text: text.into(),
        });
    }

    pub fn is_success(&self) -> bool {
        self.status == AttemptStatus::Succeeded
    }
}

/// Comprehensive report for one executed action
///
/// Carries the outcome, the full attempt log and timing. Failure reports
/// also carry a diagnostic naming the tiers and text modes that were tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    /// Unique identifier for this execution
    pub action_id: String,

    pub action_type: ActionType,

    pub description: String,

    pub outcome: ExecutionOutcome,

    /// Mode the comparison started in
    pub text_mode: TextMode,

    /// Selector that succeeded, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_selector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_tier: Option<Tier>,

    pub attempts: Vec<CandidateAttempt>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,

    /// When the action started
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    /// When the action finished
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub finished_at: DateTime<Utc>,

    /// Total latency in milliseconds
    pub latency_ms: u64,
}

impl ActionReport {
    /// Create a successful action report
    pub fn success(
        action_id: impl Into<String>,
        action_type: ActionType,
        started_at: DateTime<Utc>,
        latency_ms: u64,
        attempts: Vec<CandidateAttempt>,
    ) -> Self {
        let resolved = attempts.iter().find(|a| a.is_success());
        let resolved_selector = resolved.map(|a| a.selector.clone());
        let resolved_tier = resolved.map(|a| a.tier);

        Self {
            action_id: action_id.into(),
            action_type,
            description: String::new(),
            outcome: ExecutionOutcome::Success,
            text_mode: TextMode::default(),
            resolved_selector,
            resolved_tier,
            attempts,
            diagnostic: None,
            started_at,
            finished_at: Utc::now(),
            latency_ms,
        }
    }

    /// Create a failed action report
    pub fn failure(
        action_id: impl Into<String>,
        action_type: ActionType,
        started_at: DateTime<Utc>,
        latency_ms: u64,
        outcome: ExecutionOutcome,
        attempts: Vec<CandidateAttempt>,
    ) -> Self {
        let diagnostic = failure_diagnostic(outcome, &attempts);
        Self {
            action_id: action_id.into(),
            action_type,
            description: String::new(),
            outcome,
            text_mode: TextMode::default(),
            resolved_selector: None,
            resolved_tier: None,
            attempts,
            diagnostic: Some(diagnostic),
            started_at,
            finished_at: Utc::now(),
            latency_ms,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_text_mode(mut self, mode: TextMode) -> Self {
        self.text_mode = mode;
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Distinct tiers tried, in walk order
    pub fn tiers_tried(&self) -> Vec<Tier> {
        tiers_tried(&self.attempts)
    }

    /// Distinct text modes compared, in first-use order
    pub fn modes_tried(&self) -> Vec<TextMode> {
        modes_tried(&self.attempts)
    }
}

fn tiers_tried(attempts: &[CandidateAttempt]) -> Vec<Tier> {
    let mut tiers = Vec::new();
    for attempt in attempts {
        if !tiers.contains(&attempt.tier) {
            tiers.push(attempt.tier);
        }
    }
    tiers
}

fn modes_tried(attempts: &[CandidateAttempt]) -> Vec<TextMode> {
    let mut modes = Vec::new();
    for mode in attempts.iter().flat_map(|a| a.modes_tried.iter()) {
        if !modes.contains(mode) {
            modes.push(*mode);
        }
    }
    modes
}

fn failure_diagnostic(outcome: ExecutionOutcome, attempts: &[CandidateAttempt]) -> String {
    let tiers = tiers_tried(attempts)
        .iter()
        .map(Tier::name)
        .collect::<Vec<_>>()
        .join(", ");
    let modes = modes_tried(attempts);

    if modes.is_empty() {
        format!(
            "{} after {} candidate(s); tiers tried: [{}]",
            outcome,
            attempts.len(),
            tiers
        )
    } else {
        let modes = modes
            .iter()
            .map(TextMode::name)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} after {} candidate(s); tiers tried: [{}]; text modes tried: [{}]",
            outcome,
            attempts.len(),
            tiers,
            modes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_status_maps_to_outcome() {
        assert_eq!(AttemptStatus::NotFound.as_outcome(), ExecutionOutcome::ElementNotFound);
        assert_eq!(
            AttemptStatus::TextMismatch.as_outcome(),
            ExecutionOutcome::AssertionMismatch
        );
        assert!(AttemptStatus::Succeeded.as_outcome().is_success());
    }

    #[test]
    fn failure_report_names_tiers_and_modes() {
        let mut first = CandidateAttempt::new("[data-testid=a]", Tier::TestId);
        first.status = AttemptStatus::TextMismatch;
        first.observe(TextMode::DomText, "a");
        first.observe(TextMode::DisplayedText, "A");
        let mut second = CandidateAttempt::new("#a", Tier::SimpleCss);
        second.status = AttemptStatus::TextMismatch;
        second.observe(TextMode::DomText, "a");

        let report = ActionReport::failure(
            "id-1",
            ActionType::VerifyText,
            Utc::now(),
            3,
            ExecutionOutcome::AssertionMismatch,
            vec![first, second],
        );

        let diagnostic = report.diagnostic.clone().unwrap();
        assert!(diagnostic.starts_with("assertionMismatch after 2 candidate(s)"));
        assert!(diagnostic.contains("tiers tried: [test-id, css]"));
        assert!(diagnostic.contains("text modes tried: [domText, displayedText]"));
        assert_eq!(report.tiers_tried(), vec![Tier::TestId, Tier::SimpleCss]);
    }

    #[test]
    fn success_report_records_resolved_candidate() {
        let mut miss = CandidateAttempt::new("#gone", Tier::SimpleCss);
        miss.status = AttemptStatus::NotFound;
        let mut hit = CandidateAttempt::new("//button", Tier::XPath);
        hit.status = AttemptStatus::Succeeded;

        let report = ActionReport::success("id-2", ActionType::Click, Utc::now(), 1, vec![miss, hit]);
        assert_eq!(report.resolved_selector.as_deref(), Some("//button"));
        assert_eq!(report.resolved_tier, Some(Tier::XPath));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "success");
        assert_eq!(json["actionType"], "click");
    }
}
