use std::path::PathBuf;

use action_flow::{Scenario, ScenarioFile};
use action_locator::LocatorSet;
use action_primitives::{effective_text_mode, ActionType, TextMode};
use anyhow::{Context, Result};
use clap::Args;
use replay_recipes::{Cluster, ClusterDetector};
use serde::Serialize;
use tracing::info;

use crate::cli::context::CliContext;
use crate::cli::output::{print_json, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct AnalyzeArgs {
    /// Scenario file (YAML or JSON)
    pub scenario: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepAnalysis {
    pub index: usize,
    pub kind: ActionType,
    pub description: String,
    pub text_mode: TextMode,
    pub locators: LocatorSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub scenario: String,
    pub steps: Vec<StepAnalysis>,
    pub clusters: Vec<Cluster>,
}

impl AnalysisReport {
    pub fn build(scenario: &Scenario, detector: &ClusterDetector) -> Self {
        let steps = scenario
            .actions
            .iter()
            .enumerate()
            .map(|(index, action)| StepAnalysis {
                index,
                kind: action.action_type(),
                description: action.describe(),
                text_mode: effective_text_mode(action),
                locators: action.locators.clone(),
            })
            .collect();

        Self {
            scenario: scenario.name.clone(),
            steps,
            clusters: scenario.clusters(detector),
        }
    }
}

pub async fn cmd_analyze(args: AnalyzeArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let scenario = ScenarioFile::from_path(&args.scenario)?
        .compile()
        .with_context(|| format!("compiling {}", args.scenario.display()))?;
    let detector = ClusterDetector::new(&ctx.config().recipes)?;

    let report = AnalysisReport::build(&scenario, &detector);
    info!(
        scenario = %report.scenario,
        steps = report.steps.len(),
        clusters = report.clusters.len(),
        "Analyzed scenario"
    );

    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_human(&report),
    }

    Ok(())
}

fn print_human(report: &AnalysisReport) {
    println!("Scenario: {} ({} steps)", report.scenario, report.steps.len());

    for step in &report.steps {
        println!();
        println!("  {}. [{}] {}", step.index + 1, step.kind, step.description);
        println!(
            "     primary   [{}] {}",
            step.locators.primary.tier, step.locators.primary.selector
        );
        for fallback in &step.locators.fallbacks {
            println!("     fallback  [{}] {}", fallback.tier, fallback.selector);
        }
        for excluded in &step.locators.excluded {
            println!("     excluded  [{}] {}", excluded.tier, excluded.selector);
        }
        println!("     text mode {}", step.text_mode);
    }

    println!();
    if report.clusters.is_empty() {
        println!("Repeated step runs: none");
        return;
    }

    println!("Repeated step runs:");
    let mut groups: Vec<usize> = report.clusters.iter().map(|c| c.group).collect();
    groups.sort_unstable();
    groups.dedup();
    for group in groups {
        let members: Vec<&Cluster> = report.clusters.iter().filter(|c| c.group == group).collect();
        let ranges = members
            .iter()
            .map(|c| format!("steps {}-{}", c.start + 1, c.end))
            .collect::<Vec<_>>()
            .join(", ");
        let signature = members[0]
            .signature
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" > ");
        println!("  group {}: {} ({})", group, ranges, signature);
    }
}
