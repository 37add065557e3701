use std::path::PathBuf;
use std::sync::Arc;

use action_flow::{
    DefaultScenarioRunner, FailureStrategy, ScenarioFile, ScenarioReport, ScenarioRunner,
};
use action_primitives::{ActionExecutor, PageSnapshot, SnapshotDriver};
use anyhow::{bail, Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::context::CliContext;
use crate::cli::output::{print_json, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct ReplayArgs {
    /// Scenario file (YAML or JSON)
    pub scenario: PathBuf,

    /// Page snapshot to replay against (YAML or JSON)
    #[arg(short, long, value_name = "PAGE")]
    pub snapshot: PathBuf,

    /// Keep running after a failed step
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Per-candidate lookup wait in milliseconds
    #[arg(long)]
    pub element_wait_ms: Option<u64>,

    /// Maximum candidates tried per step
    #[arg(long)]
    pub max_candidates: Option<usize>,
}

pub async fn cmd_replay(args: ReplayArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let scenario = ScenarioFile::from_path(&args.scenario)?
        .compile()
        .with_context(|| format!("compiling {}", args.scenario.display()))?;
    let snapshot = PageSnapshot::from_path(&args.snapshot)?;

    let mut exec_config = ctx.config().executor.clone();
    if let Some(ms) = args.element_wait_ms {
        exec_config = exec_config.with_element_wait_ms(ms.max(1));
    }
    if let Some(cap) = args.max_candidates {
        exec_config = exec_config.with_max_candidates(Some(cap));
    }

    let mut flow_config = ctx.config().flow.clone();
    if args.continue_on_failure {
        flow_config.on_failure = FailureStrategy::Continue;
    }

    let driver = Arc::new(SnapshotDriver::new(snapshot));
    let executor = ActionExecutor::new(driver, exec_config);
    let runner =
        DefaultScenarioRunner::new(executor, flow_config).with_policy(&ctx.config().recipes)?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; stopping after the current step");
                cancel.cancel();
            }
        })
    };

    let report = runner.run(&scenario, &cancel).await;
    ctrl_c.abort();

    info!(
        scenario = %report.scenario,
        success = report.success,
        steps = report.steps.len(),
        "Replay finished"
    );

    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_human(&report),
    }

    if !report.success {
        let reason = report
            .abort_reason
            .clone()
            .unwrap_or_else(|| format!("{} step(s) failed", report.failed_steps().count()));
        bail!("scenario '{}' failed: {}", report.scenario, reason);
    }

    Ok(())
}

fn print_human(report: &ScenarioReport) {
    println!("Scenario: {}", report.scenario);
    for (line, step) in report.step_log.iter().zip(&report.steps) {
        match (&step.report.resolved_selector, &step.report.resolved_tier) {
            (Some(selector), Some(tier)) => println!("  {} [via {} {}]", line, tier, selector),
            _ => println!("  {}", line),
        }
        if let Some(diagnostic) = &step.report.diagnostic {
            println!("     {}", diagnostic);
        }
    }

    if !report.clusters.is_empty() {
        let ranges = report
            .clusters
            .iter()
            .map(|c| format!("{}-{}", c.start + 1, c.end))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Repeated step runs: {}", ranges);
    }

    let passed = report.steps.iter().filter(|s| s.success).count();
    println!(
        "Result: {} ({}/{} steps, {} ms)",
        if report.success { "PASSED" } else { "FAILED" },
        passed,
        report.steps.len(),
        report.latency_ms
    );
}
