use action_locator::{build_locator_set, Tier};
use action_primitives::{
    ActionExecutor, ActionKind, AttemptStatus, DriverError, ElementDriver, ElementHandle,
    ExecConfig, ExecutionOutcome, Interaction, PageSnapshot, SnapshotDriver, SnapshotElement,
    TextMode, UiAction,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

fn action(kind: ActionKind, candidates: &[&str]) -> UiAction {
    let locators = build_locator_set(Some(candidates)).expect("valid candidates");
    UiAction::new(kind, locators)
}

fn fast_config() -> ExecConfig {
    ExecConfig::default().with_element_wait_ms(50)
}

fn booking_page() -> Arc<SnapshotDriver> {
    Arc::new(SnapshotDriver::new(PageSnapshot::new(vec![
        SnapshotElement::new(&["#status", "[data-testid='status']"], "Pre-Arrival")
            .with_id("status")
            .with_displayed_text("PRE-ARRIVAL"),
        SnapshotElement::new(&["#guest-name"], "").with_id("guest"),
        SnapshotElement::new(&["text=Check in", "button.primary"], "Check in").with_id("check-in"),
    ])))
}

#[tokio::test]
async fn verify_succeeds_via_displayed_text_retry() {
    let driver = booking_page();
    let executor = ActionExecutor::new(driver, fast_config());
    let action = action(
        ActionKind::VerifyText {
            expected: "PRE-ARRIVAL".into(),
        },
        &["#status"],
    )
    .with_text_mode(TextMode::DomText);

    let report = executor.execute(&action).await;

    assert_eq!(report.outcome, ExecutionOutcome::Success);
    assert_eq!(report.text_mode, TextMode::DomText);
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(
        report.attempts[0].modes_tried,
        vec![TextMode::DomText, TextMode::DisplayedText]
    );
    assert_eq!(report.attempts[0].observed[0].text, "Pre-Arrival");
}

#[tokio::test]
async fn verify_succeeds_via_dom_text_retry() {
    let executor = ActionExecutor::new(booking_page(), fast_config());
    let action = action(
        ActionKind::VerifyText {
            expected: "Pre-Arrival".into(),
        },
        &["#status"],
    )
    .with_text_mode(TextMode::DisplayedText);

    let report = executor.execute(&action).await;

    assert_eq!(report.outcome, ExecutionOutcome::Success);
    assert_eq!(report.text_mode, TextMode::DisplayedText);
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(
        report.attempts[0].modes_tried,
        vec![TextMode::DisplayedText, TextMode::DomText]
    );
    assert_eq!(report.attempts[0].observed[0].text, "PRE-ARRIVAL");
    assert_eq!(report.attempts[0].observed[1].text, "Pre-Arrival");
}

#[tokio::test]
async fn verify_without_cross_mode_retry_is_assertion_mismatch() {
    let executor = ActionExecutor::new(booking_page(), fast_config().with_cross_mode_retry(false));
    let action = action(
        ActionKind::VerifyText {
            expected: "PRE-ARRIVAL".into(),
        },
        &["#status"],
    )
    .with_text_mode(TextMode::DomText);

    let report = executor.execute(&action).await;

    assert_eq!(report.outcome, ExecutionOutcome::AssertionMismatch);
    assert_eq!(report.attempts[0].modes_tried, vec![TextMode::DomText]);
    assert!(report
        .diagnostic
        .as_deref()
        .unwrap()
        .contains("text modes tried: [domText]"));
}

#[tokio::test]
async fn verify_mismatch_in_both_modes_is_assertion_mismatch() {
    let executor = ActionExecutor::new(booking_page(), fast_config());
    let action = action(
        ActionKind::VerifyText {
            expected: "Checked out".into(),
        },
        &["[data-testid='status']", "#status"],
    );

    let report = executor.execute(&action).await;

    assert_eq!(report.outcome, ExecutionOutcome::AssertionMismatch);
    assert_eq!(report.attempts.len(), 2);
    assert!(report
        .attempts
        .iter()
        .all(|a| a.status == AttemptStatus::TextMismatch && a.modes_tried.len() == 2));
}

#[tokio::test]
async fn verify_compares_trimmed_text() {
    let driver = Arc::new(SnapshotDriver::new(PageSnapshot::new(vec![
        SnapshotElement::new(&["#total"], "  42 EUR\n"),
    ])));
    let executor = ActionExecutor::new(driver, fast_config());
    let action = action(
        ActionKind::VerifyText {
            expected: " 42 EUR".into(),
        },
        &["#total"],
    );

    assert!(executor.execute(&action).await.is_success());
}

#[tokio::test]
async fn unresolvable_candidates_fail_all_candidates() {
    let executor = ActionExecutor::new(booking_page(), fast_config());
    let action = action(
        ActionKind::Click,
        &["[data-testid='missing']", "#missing", "//div[@id='missing']"],
    );

    let report = executor.execute(&action).await;

    assert_eq!(report.outcome, ExecutionOutcome::FailedAllCandidates);
    assert_eq!(report.attempts.len(), 3);
    assert!(report
        .attempts
        .iter()
        .all(|a| a.status.as_outcome() == ExecutionOutcome::ElementNotFound));
    assert_eq!(
        report.tiers_tried(),
        vec![Tier::TestId, Tier::SimpleCss, Tier::XPath]
    );
    assert!(report
        .diagnostic
        .as_deref()
        .unwrap()
        .contains("tiers tried: [test-id, css, xpath]"));
}

#[tokio::test]
async fn click_falls_back_past_missing_primary() {
    let driver = booking_page();
    let executor = ActionExecutor::new(driver.clone(), fast_config());
    let action = action(
        ActionKind::Click,
        &["button.primary", "[data-testid='check-in']", "text=Check in"],
    );

    let report = executor.execute(&action).await;

    assert!(report.is_success());
    assert_eq!(report.resolved_selector.as_deref(), Some("text=Check in"));
    assert_eq!(report.resolved_tier, Some(Tier::SemanticText));
    assert_eq!(report.attempts[0].status, AttemptStatus::NotFound);
    assert_eq!(
        driver.interactions(),
        vec![Interaction::Click {
            element: "check-in".into()
        }]
    );
}

#[tokio::test]
async fn input_fills_value() {
    let driver = booking_page();
    let executor = ActionExecutor::new(driver.clone(), fast_config());
    let action = action(
        ActionKind::Input {
            value: "Ada Lovelace".into(),
        },
        &["#guest-name"],
    );

    let report = executor.execute(&action).await;

    assert!(report.is_success());
    assert_eq!(driver.value_of("guest").as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn candidate_cap_limits_the_walk() {
    let executor = ActionExecutor::new(
        booking_page(),
        fast_config().with_max_candidates(Some(1)),
    );
    let action = action(ActionKind::Click, &["[data-testid='gone']", "button.primary"]);

    let report = executor.execute(&action).await;

    assert_eq!(report.outcome, ExecutionOutcome::FailedAllCandidates);
    assert_eq!(report.attempts.len(), 1);
}

/// Driver whose lookups either fail or hang past any sane timeout
struct FaultyDriver;

#[async_trait]
impl ElementDriver for FaultyDriver {
    async fn find_element(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError> {
        match selector {
            "#broken" => Err(DriverError::Io("connection reset".into())),
            "#hangs" => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Some(ElementHandle::new("late")))
            }
            "#locked" => Ok(Some(ElementHandle::new("locked"))),
            _ => Ok(Some(ElementHandle::new("ok"))),
        }
    }

    async fn read_dom_text(&self, _handle: &ElementHandle) -> Result<String, DriverError> {
        Ok("ok".into())
    }

    async fn read_displayed_text(&self, _handle: &ElementHandle) -> Result<String, DriverError> {
        Ok("OK".into())
    }

    async fn click(&self, handle: &ElementHandle) -> Result<(), DriverError> {
        if handle.as_str() == "locked" {
            Err(DriverError::NotInteractable(handle.to_string()))
        } else {
            Ok(())
        }
    }

    async fn fill(&self, _handle: &ElementHandle, _value: &str) -> Result<(), DriverError> {
        Ok(())
    }
}

#[tokio::test]
async fn driver_errors_are_recorded_and_walk_continues() {
    let executor = ActionExecutor::new(Arc::new(FaultyDriver), fast_config());
    let action = action(ActionKind::Click, &["#broken", "#hangs", "#locked", "#fine"]);

    let report = executor.execute(&action).await;

    assert!(report.is_success());
    let statuses: Vec<_> = report.attempts.iter().map(|a| a.status).collect();
    assert_eq!(
        statuses,
        vec![
            AttemptStatus::LookupFailed,
            AttemptStatus::NotFound,
            AttemptStatus::InteractionFailed,
            AttemptStatus::Succeeded,
        ]
    );
    assert!(report.attempts[0]
        .error
        .as_deref()
        .unwrap()
        .contains("connection reset"));
    assert!(report.attempts[1].elapsed_ms < 5_000);
}
