use assert_cmd::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCENARIO: &str = "tests/fixtures/front_desk.yaml";
const PAGE: &str = "tests/fixtures/front_desk_page.yaml";
const FAILING: &str = "tests/fixtures/missing_button.yaml";
const ICON_ONLY: &str = "tests/fixtures/icon_only.yaml";

fn locator_replay(config: &Path) -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("locator-replay");
    let mut cmd = Command::new(bin);
    cmd.env_remove("RUST_LOG")
        .env_remove("LOCATOR_REPLAY_ELEMENT_WAIT_MS")
        .env_remove("LOCATOR_REPLAY_MAX_CANDIDATES")
        .env_remove("LOCATOR_REPLAY_ON_FAILURE")
        .arg("--config")
        .arg(config);
    cmd
}

fn temp_config() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("locator-replay.yaml");
    (dir, path)
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("valid json on stdout")
}

#[test]
fn analyze_prints_ranked_locators_and_clusters() {
    let (_dir, config) = temp_config();
    let assert = locator_replay(&config)
        .args(["analyze", SCENARIO])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.starts_with("Scenario: front desk check-in (7 steps)"));
    assert!(stdout.contains("primary   [test-id] [data-testid='login']"));
    assert!(stdout.contains("fallback  [css] button.login"));
    assert!(stdout.contains("excluded  [icon] i.fa-sign-in"));
    assert!(stdout.contains("group 0: steps 1-3, steps 5-7"));
}

#[test]
fn analyze_json_reports_cluster_ranges() {
    let (_dir, config) = temp_config();
    let output = locator_replay(&config)
        .args(["--output", "json", "analyze", SCENARIO])
        .output()
        .expect("run analyze");
    assert!(output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["scenario"].as_str(), Some("front desk check-in"));
    assert_eq!(value["steps"].as_array().unwrap().len(), 7);
    assert_eq!(value["steps"][2]["locators"]["primary"]["tier"].as_str(), Some("testId"));
    assert_eq!(value["steps"][3]["textMode"].as_str(), Some("displayedText"));

    let clusters = value["clusters"].as_array().unwrap();
    let ranges: Vec<(u64, u64)> = clusters
        .iter()
        .map(|c| (c["start"].as_u64().unwrap(), c["end"].as_u64().unwrap()))
        .collect();
    assert_eq!(ranges, vec![(0, 3), (4, 7)]);
}

#[test]
fn analyze_rejects_icon_only_step() {
    let (_dir, config) = temp_config();
    let output = locator_replay(&config)
        .args(["analyze", ICON_ONLY])
        .output()
        .expect("run analyze");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Step 1 is invalid"), "stderr: {}", stderr);
    assert!(stderr.contains("icon selectors"), "stderr: {}", stderr);
}

#[test]
fn replay_passes_against_snapshot() {
    let (_dir, config) = temp_config();
    let assert = locator_replay(&config)
        .args(["replay", SCENARIO, "--snapshot", PAGE])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("4. Booking shows pre-arrival status -> success"));
    assert!(stdout.contains("Repeated step runs: 1-3, 5-7"));
    assert!(stdout.contains("Result: PASSED (7/7 steps"));
}

#[test]
fn replay_failure_exits_non_zero() {
    let (_dir, config) = temp_config();
    let output = locator_replay(&config)
        .args([
            "--output",
            "json",
            "replay",
            FAILING,
            "--snapshot",
            PAGE,
            "--element-wait-ms",
            "20",
        ])
        .output()
        .expect("run replay");
    assert!(!output.status.success());

    let value = stdout_json(&output);
    assert_eq!(value["success"].as_bool(), Some(false));
    assert_eq!(value["steps"].as_array().unwrap().len(), 1);
    assert_eq!(
        value["steps"][0]["report"]["outcome"].as_str(),
        Some("failedAllCandidates")
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scenario 'missing button' failed"), "stderr: {}", stderr);
}

#[test]
fn replay_continue_on_failure_runs_every_step() {
    let (_dir, config) = temp_config();
    let output = locator_replay(&config)
        .args([
            "--output",
            "json",
            "replay",
            FAILING,
            "--snapshot",
            PAGE,
            "--element-wait-ms",
            "20",
            "--continue-on-failure",
        ])
        .output()
        .expect("run replay");
    assert!(!output.status.success());

    let value = stdout_json(&output);
    let steps = value["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1]["success"].as_bool(), Some(true));
}

#[test]
fn config_reset_then_validate() {
    let (_dir, config) = temp_config();

    locator_replay(&config)
        .args(["config", "validate"])
        .assert()
        .success();

    locator_replay(&config)
        .args(["config", "reset"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&config).expect("config written");
    assert!(written.contains("element_wait_ms: 5000"));

    let assert = locator_replay(&config)
        .args(["config", "validate"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("is valid"));
}

#[test]
fn config_set_persists_and_get_reads_back() {
    let (_dir, config) = temp_config();

    locator_replay(&config)
        .args(["config", "set", "executor.max_candidates", "2"])
        .assert()
        .success();

    let output = locator_replay(&config)
        .args(["--output", "json", "config", "get", "executor.max_candidates"])
        .output()
        .expect("run config get");
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), Value::from(2));

    locator_replay(&config)
        .args(["config", "set", "recipes.min_cluster_len", "1"])
        .assert()
        .failure();
}

#[test]
fn invalid_config_file_blocks_replay_but_not_config_commands() {
    let (_dir, config) = temp_config();
    std::fs::write(&config, "executor:\n  max_candidates: 0\n").expect("write config");

    locator_replay(&config)
        .args(["analyze", SCENARIO])
        .assert()
        .failure();

    let output = locator_replay(&config)
        .args(["config", "validate"])
        .output()
        .expect("run config validate");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("max_candidates"), "stderr: {}", stderr);

    locator_replay(&config)
        .args(["config", "show"])
        .assert()
        .success();

    locator_replay(&config)
        .args(["config", "reset"])
        .assert()
        .success();
    locator_replay(&config)
        .args(["config", "validate"])
        .assert()
        .success();
    locator_replay(&config)
        .args(["analyze", SCENARIO])
        .assert()
        .success();
}
